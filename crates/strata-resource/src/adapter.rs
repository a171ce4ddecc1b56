use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_connector::{ConnectorError, ResolveCtx};
use strata_provider::CloudProvider;
use uuid::Uuid;

use crate::error::AdapterError;
use crate::tags::SystemTags;

/// The five hooks a concrete resource (one AWS object type, say) supplies.
/// The engine owns everything else — identity, dependency discovery, state
/// envelope read/write, connector resolution.
///
/// Implementors are external collaborators; this crate defines only the
/// contract and the default apply algorithm that drives it.
pub trait ResourceAdapter: Send + Sync {
    type Input: Serialize + DeserializeOwned + Clone + Send + Sync;
    type Output: Serialize + DeserializeOwned + Clone + Default + Send + Sync;

    /// Stable string identifying this adapter, persisted in every envelope
    /// it writes so pending-destroy drain can reconstruct it without the
    /// declaring program.
    fn class_tag(&self) -> &'static str;

    /// Must be idempotent under dry-run: when `dry` is set, fabricate
    /// plausible sentinel outputs rather than calling the provider, so
    /// downstream Connectors still resolve. `tags` is this resource's
    /// engine-computed identity metadata (spec §4.2); an adapter whose
    /// provider supports tagging merges `tags.as_map()` over its own
    /// declared tags before calling out.
    fn create(
        &mut self,
        input: &Self::Input,
        tags: &SystemTags,
        provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<Self::Output, AdapterError>;

    /// Returns `true` if the in-place update succeeded, `false` to signal
    /// the engine should replace (destroy-then-create or
    /// create-before-destroy, per `create_before_destroy`).
    fn update(
        &mut self,
        input: &Self::Input,
        prev_input: &Self::Input,
        tags: &SystemTags,
        provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<bool, AdapterError>;

    /// `AdapterError::NotFound` is swallowed by the engine — already gone
    /// counts as destroyed.
    fn destroy(
        &mut self,
        prev_input: &Self::Input,
        provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<(), AdapterError>;

    /// A `NotFound`-class error here means "drifted" (resource externally
    /// deleted), not a query failure.
    fn is_drifted(
        &self,
        output: &Self::Output,
        provider: &dyn CloudProvider,
        dry: bool,
    ) -> Result<bool, AdapterError>;

    /// When `false` (the default), a replace destroys the old instance
    /// inline before creating the new one and no pending-destroy entry is
    /// emitted.
    fn create_before_destroy(&self) -> bool {
        false
    }

    /// Structural walk discovering every `Bound::Deferred` field's root
    /// producers before resolution. The engine has no reflection over
    /// `Self::Input`, so each adapter enumerates its own Connector-capable
    /// fields (spec §9, "adapter-supplied input walkers").
    fn input_dependencies(&self, input: &Self::Input) -> HashSet<Uuid>;

    /// Resolves every `Bound::Deferred` field in `input` in place. Called
    /// once per apply, after every dependency has applied.
    fn resolve_input(&self, input: &mut Self::Input, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError>;
}
