use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strata_connector::{Bound, ConnectorError, ResolveCtx};
use strata_provider::CloudProvider;
use strata_resource::{AdapterError, ResourceAdapter, SystemTags};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupInput {
    pub vpc_id: Bound<String>,
    pub description: String,
    pub ingress_ports: Vec<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityGroupOutput {
    pub group_id: String,
}

/// Grounded on `pdep.aws.network.SecurityGroup`. Ingress rule changes are
/// applied in place; only a change to `vpc_id` forces a replace.
#[derive(Debug, Default)]
pub struct SecurityGroupAdapter;

impl ResourceAdapter for SecurityGroupAdapter {
    type Input = SecurityGroupInput;
    type Output = SecurityGroupOutput;

    fn class_tag(&self) -> &'static str {
        "demo.SecurityGroup"
    }

    fn create(
        &mut self,
        input: &SecurityGroupInput,
        _tags: &SystemTags,
        _provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<SecurityGroupOutput, AdapterError> {
        if dry {
            return Ok(SecurityGroupOutput { group_id: "sg-dummy".to_string() });
        }
        let group_id = format!("sg-{}", &apply_uuid.simple().to_string()[..8]);
        tracing::info!(vpc_id = %input.vpc_id.get(), %group_id, "created security group");
        Ok(SecurityGroupOutput { group_id })
    }

    fn update(
        &mut self,
        input: &SecurityGroupInput,
        prev_input: &SecurityGroupInput,
        _tags: &SystemTags,
        _provider: &dyn CloudProvider,
        _apply_uuid: Uuid,
        dry: bool,
    ) -> Result<bool, AdapterError> {
        if input.vpc_id.get() != prev_input.vpc_id.get() {
            return Ok(false);
        }
        if dry {
            return Ok(true);
        }
        tracing::info!(ports = ?input.ingress_ports, "updated security group ingress rules");
        Ok(true)
    }

    fn destroy(
        &mut self,
        prev_input: &SecurityGroupInput,
        _provider: &dyn CloudProvider,
        _apply_uuid: Uuid,
        dry: bool,
    ) -> Result<(), AdapterError> {
        if dry {
            return Ok(());
        }
        tracing::info!(vpc_id = %prev_input.vpc_id.get(), "destroyed security group");
        Ok(())
    }

    fn is_drifted(&self, _output: &SecurityGroupOutput, _provider: &dyn CloudProvider, dry: bool) -> Result<bool, AdapterError> {
        if dry {
            return Ok(false);
        }
        Ok(false)
    }

    fn input_dependencies(&self, input: &SecurityGroupInput) -> HashSet<Uuid> {
        input.vpc_id.root_producers()
    }

    fn resolve_input(&self, input: &mut SecurityGroupInput, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError> {
        input.vpc_id.resolve(ctx)
    }
}
