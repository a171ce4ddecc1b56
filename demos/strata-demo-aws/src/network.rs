use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strata_connector::{Bound, Connector, ConnectorError, ResolveCtx};
use strata_plan::PlanAdapter;
use strata_resource::{sub_uuid, Arena, Resource, ResourceNode};
use uuid::Uuid;

use crate::security_group::{SecurityGroupAdapter, SecurityGroupInput, SecurityGroupOutput};
use crate::subnet::{SubnetAdapter, SubnetInput, SubnetOutput};
use crate::vpc::{VpcAdapter, VpcInput, VpcOutput};

fn vpc_uuid(plan_uuid: Uuid) -> Uuid {
    sub_uuid(plan_uuid, "demo.Vpc", "vpc")
}

fn subnet_uuid(plan_uuid: Uuid) -> Uuid {
    sub_uuid(plan_uuid, "demo.Subnet", "subnet")
}

fn security_group_uuid(plan_uuid: Uuid) -> Uuid {
    sub_uuid(plan_uuid, "demo.SecurityGroup", "security_group")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkPlanInput {
    pub cidr_block: Bound<String>,
    pub subnet_cidr_block: Bound<String>,
    pub availability_zone: String,
    pub ingress_ports: Vec<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkPlanOutput {
    pub vpc_id: String,
    pub subnet_id: String,
    pub security_group_id: String,
}

/// A demo network: one Vpc, one Subnet inside it, and one SecurityGroup
/// attached to it. Grounded on `pdep.aws.network`'s top-level module, which
/// composes the same three resources behind a single entry point.
#[derive(Debug, Default)]
pub struct NetworkPlanAdapter;

impl PlanAdapter for NetworkPlanAdapter {
    type Input = NetworkPlanInput;
    type Output = NetworkPlanOutput;

    fn class_tag(&self) -> &'static str {
        "demo.Network"
    }

    fn input_dependencies(&self, input: &Self::Input) -> std::collections::HashSet<Uuid> {
        let mut deps = input.cidr_block.root_producers();
        deps.extend(input.subnet_cidr_block.root_producers());
        deps
    }

    fn resolve_input(&self, input: &mut Self::Input, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError> {
        input.cidr_block.resolve(ctx)?;
        input.subnet_cidr_block.resolve(ctx)
    }

    fn init_resources(
        &self,
        input: &Self::Input,
        plan_uuid: Uuid,
        _arena: &mut Arena,
    ) -> Vec<(String, Box<dyn ResourceNode>)> {
        let vpc_uuid = vpc_uuid(plan_uuid);

        let vpc = Resource::pending(
            VpcAdapter,
            VpcInput { cidr_block: input.cidr_block.clone(), tags: BTreeMap::new() },
        );

        let subnet = Resource::pending(
            SubnetAdapter,
            SubnetInput {
                vpc_id: Bound::Deferred(Connector::<String>::of(vpc_uuid).field("vpc_id")),
                cidr_block: input.subnet_cidr_block.clone(),
                availability_zone: input.availability_zone.clone(),
            },
        );

        let security_group = Resource::pending(
            SecurityGroupAdapter,
            SecurityGroupInput {
                vpc_id: Bound::Deferred(Connector::<String>::of(vpc_uuid).field("vpc_id")),
                description: "demo network security group".to_string(),
                ingress_ports: input.ingress_ports.clone(),
            },
        );

        vec![
            ("vpc".to_string(), Box::new(vpc)),
            ("subnet".to_string(), Box::new(subnet)),
            ("security_group".to_string(), Box::new(security_group)),
        ]
    }

    fn compose_output(
        &self,
        _input: &Self::Input,
        plan_uuid: Uuid,
        children: &dyn ResolveCtx,
    ) -> Result<Self::Output, ConnectorError> {
        let vpc_id: VpcOutput = Connector::of(vpc_uuid(plan_uuid)).resolve(children)?;
        let subnet_id: SubnetOutput = Connector::of(subnet_uuid(plan_uuid)).resolve(children)?;
        let security_group_id: SecurityGroupOutput = Connector::of(security_group_uuid(plan_uuid)).resolve(children)?;

        Ok(NetworkPlanOutput {
            vpc_id: vpc_id.vpc_id,
            subnet_id: subnet_id.subnet_id,
            security_group_id: security_group_id.group_id,
        })
    }
}
