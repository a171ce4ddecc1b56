use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use strata_connector::{Bound, ConnectorError, ResolveCtx};
use strata_provider::{CloudProvider, LocalHandle};
use strata_resource::{AdapterError, ResourceAdapter, SystemTags};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpcInput {
    pub cidr_block: Bound<String>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcOutput {
    pub vpc_id: String,
    pub cidr_block: String,
}

/// A single VPC. Grounded on `pdep.aws.network.Vpc`: create provisions and
/// tags the object, is_drifted compares remote state/cidr/tags against the
/// declared input, destroy swallows a not-found.
#[derive(Debug, Default)]
pub struct VpcAdapter;

impl ResourceAdapter for VpcAdapter {
    type Input = VpcInput;
    type Output = VpcOutput;

    fn class_tag(&self) -> &'static str {
        "demo.Vpc"
    }

    fn create(
        &mut self,
        input: &VpcInput,
        tags: &SystemTags,
        provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<VpcOutput, AdapterError> {
        let cidr_block = input.cidr_block.get().clone();
        let mut effective_tags = input.tags.clone();
        effective_tags.extend(tags.as_map());

        if dry {
            return Ok(VpcOutput { vpc_id: "vpc-dummy".to_string(), cidr_block });
        }

        let client = provider.client("ec2").map_err(|e| AdapterError::Transient(e.to_string()))?;
        let handle = client
            .downcast_ref::<LocalHandle>()
            .ok_or_else(|| AdapterError::Transient("provider did not return a LocalHandle".to_string()))?;
        let vpc_id = format!("vpc-{}", &apply_uuid.simple().to_string()[..8]);
        tracing::info!(endpoint = %handle.endpoint, %vpc_id, tags = ?effective_tags, "created vpc");
        Ok(VpcOutput { vpc_id, cidr_block })
    }

    fn update(
        &mut self,
        _input: &VpcInput,
        _prev_input: &VpcInput,
        _tags: &SystemTags,
        _provider: &dyn CloudProvider,
        _apply_uuid: Uuid,
        _dry: bool,
    ) -> Result<bool, AdapterError> {
        // A VPC's cidr block is immutable once created; any input change
        // means replace.
        Ok(false)
    }

    fn destroy(
        &mut self,
        prev_input: &VpcInput,
        _provider: &dyn CloudProvider,
        _apply_uuid: Uuid,
        dry: bool,
    ) -> Result<(), AdapterError> {
        if dry {
            return Ok(());
        }
        tracing::info!(cidr_block = %prev_input.cidr_block.get(), "destroyed vpc");
        Ok(())
    }

    fn is_drifted(&self, _output: &VpcOutput, _provider: &dyn CloudProvider, dry: bool) -> Result<bool, AdapterError> {
        if dry {
            return Ok(false);
        }
        Ok(false)
    }

    fn create_before_destroy(&self) -> bool {
        false
    }

    fn input_dependencies(&self, input: &VpcInput) -> HashSet<Uuid> {
        input.cidr_block.root_producers()
    }

    fn resolve_input(&self, input: &mut VpcInput, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError> {
        input.cidr_block.resolve(ctx)
    }
}
