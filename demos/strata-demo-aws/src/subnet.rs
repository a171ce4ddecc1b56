use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strata_connector::{Bound, ConnectorError, ResolveCtx};
use strata_provider::CloudProvider;
use strata_resource::{AdapterError, ResourceAdapter, SystemTags};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetInput {
    pub vpc_id: Bound<String>,
    pub cidr_block: Bound<String>,
    pub availability_zone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubnetOutput {
    pub subnet_id: String,
    pub cidr_block: String,
}

/// Grounded on `pdep.aws.network.Subnet`. A Subnet always depends on its
/// parent Vpc's output via `vpc_id`; replacement on the Vpc cascades to a
/// replacement here since `vpc_id` changes underneath it.
#[derive(Debug, Default)]
pub struct SubnetAdapter;

impl ResourceAdapter for SubnetAdapter {
    type Input = SubnetInput;
    type Output = SubnetOutput;

    fn class_tag(&self) -> &'static str {
        "demo.Subnet"
    }

    fn create(
        &mut self,
        input: &SubnetInput,
        _tags: &SystemTags,
        _provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<SubnetOutput, AdapterError> {
        let cidr_block = input.cidr_block.get().clone();
        if dry {
            return Ok(SubnetOutput { subnet_id: "subnet-dummy".to_string(), cidr_block });
        }
        let subnet_id = format!("subnet-{}", &apply_uuid.simple().to_string()[..8]);
        tracing::info!(vpc_id = %input.vpc_id.get(), %subnet_id, "created subnet");
        Ok(SubnetOutput { subnet_id, cidr_block })
    }

    fn update(
        &mut self,
        _input: &SubnetInput,
        _prev_input: &SubnetInput,
        _tags: &SystemTags,
        _provider: &dyn CloudProvider,
        _apply_uuid: Uuid,
        _dry: bool,
    ) -> Result<bool, AdapterError> {
        Ok(false)
    }

    fn destroy(
        &mut self,
        prev_input: &SubnetInput,
        _provider: &dyn CloudProvider,
        _apply_uuid: Uuid,
        dry: bool,
    ) -> Result<(), AdapterError> {
        if dry {
            return Ok(());
        }
        tracing::info!(vpc_id = %prev_input.vpc_id.get(), "destroyed subnet");
        Ok(())
    }

    fn is_drifted(&self, _output: &SubnetOutput, _provider: &dyn CloudProvider, dry: bool) -> Result<bool, AdapterError> {
        if dry {
            return Ok(false);
        }
        Ok(false)
    }

    fn create_before_destroy(&self) -> bool {
        true
    }

    fn input_dependencies(&self, input: &SubnetInput) -> HashSet<Uuid> {
        let mut deps = input.vpc_id.root_producers();
        deps.extend(input.cidr_block.root_producers());
        deps
    }

    fn resolve_input(&self, input: &mut SubnetInput, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError> {
        input.vpc_id.resolve(ctx)?;
        input.cidr_block.resolve(ctx)
    }
}
