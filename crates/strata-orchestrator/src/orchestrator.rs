use std::collections::HashSet;

use strata_plan::{apply_node, destroy_node};
use strata_provider::CloudProvider;
use strata_resource::{Arena, ResourceNode, RunContext};
use strata_state::StateStore;
use tracing::{info, info_span};
use uuid::Uuid;

use crate::error::OrchestratorError;
use crate::registry::PendingDestroyRegistry;

/// Applies the tree rooted at `root`: generates a fresh `apply_uuid`,
/// drives dependency-first traversal, then drains pending-destroy exactly
/// once, in reverse of insertion order (spec §4.5, §5). Returns the
/// `apply_uuid` so callers can attribute remote changes to this run.
pub fn apply_root(
    arena: &mut Arena,
    root: Uuid,
    provider: &dyn CloudProvider,
    store: &dyn StateStore,
    registry: &PendingDestroyRegistry,
    dry: bool,
) -> Result<Uuid, OrchestratorError> {
    let apply_uuid = Uuid::new_v4();
    let span = info_span!("apply", %apply_uuid, %root, dry);
    let _enter = span.enter();

    arena.reset_all_applied();
    arena.wire_dependents();

    let root_plan_class_tag = arena.get(root).map(|node| node.class_tag()).unwrap_or("unknown");
    let ctx = RunContext { provider, store, apply_uuid, dry, root_plan_uuid: root, root_plan_class_tag };
    let mut visited = HashSet::new();
    apply_node(arena, root, &ctx, &mut visited)?;

    drain_pending_destroy(provider, store, registry, apply_uuid, dry)?;

    info!("apply complete");
    Ok(apply_uuid)
}

/// Destroys the tree rooted at `root`. Does not touch pending-destroy —
/// a full destroy has no replacements in flight to defer against.
pub fn destroy_root(
    arena: &mut Arena,
    root: Uuid,
    provider: &dyn CloudProvider,
    store: &dyn StateStore,
    dry: bool,
) -> Result<Uuid, OrchestratorError> {
    let apply_uuid = Uuid::new_v4();
    let span = info_span!("destroy", %apply_uuid, %root, dry);
    let _enter = span.enter();

    arena.reset_all_applied();
    arena.wire_dependents();

    let root_plan_class_tag = arena.get(root).map(|node| node.class_tag()).unwrap_or("unknown");
    let ctx = RunContext { provider, store, apply_uuid, dry, root_plan_uuid: root, root_plan_class_tag };
    let mut visited = HashSet::new();
    destroy_node(arena, root, &ctx, &mut visited)?;

    info!("destroy complete");
    Ok(apply_uuid)
}

/// Drains the pending-destroy FIFO in reverse insertion order (LIFO), at
/// most once per root apply. Each entry is reconstructed from its
/// class_tag via `registry` and destroyed directly against its persisted
/// input — it has no dependents left to traverse.
fn drain_pending_destroy(
    provider: &dyn CloudProvider,
    store: &dyn StateStore,
    registry: &PendingDestroyRegistry,
    apply_uuid: Uuid,
    dry: bool,
) -> Result<(), OrchestratorError> {
    let pending = store.list_pending_destroy()?;
    for envelope in pending.into_iter().rev() {
        info!(uuid = %envelope.uuid, class = %envelope.class_tag, "draining pending destroy");
        registry.destroy(&envelope, provider, apply_uuid, dry)?;
        store.delete(envelope.uuid, true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use strata_provider::LocalProvider;
    use strata_resource::{AdapterError, Resource, ResourceAdapter};
    use strata_state::InMemoryStore;

    #[derive(Clone, Serialize, Deserialize)]
    struct Input {
        value: u32,
    }

    #[derive(Clone, Serialize, Deserialize, Default)]
    struct Output {
        echoed: u32,
    }

    struct SwapAdapter;

    impl ResourceAdapter for SwapAdapter {
        type Input = Input;
        type Output = Output;

        fn class_tag(&self) -> &'static str {
            "test.Swap"
        }

        fn create(&mut self, input: &Input, _tags: &strata_resource::SystemTags, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<Output, AdapterError> {
            Ok(Output { echoed: input.value })
        }

        fn update(&mut self, _i: &Input, _pi: &Input, _tags: &strata_resource::SystemTags, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<bool, AdapterError> {
            Ok(false)
        }

        fn destroy(&mut self, _pi: &Input, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<(), AdapterError> {
            Ok(())
        }

        fn is_drifted(&self, _o: &Output, _p: &dyn CloudProvider, _d: bool) -> Result<bool, AdapterError> {
            Ok(false)
        }

        fn create_before_destroy(&self) -> bool {
            true
        }

        fn input_dependencies(&self, _input: &Input) -> HashSet<Uuid> {
            HashSet::new()
        }

        fn resolve_input(&self, _input: &mut Input, _ctx: &dyn strata_connector::ResolveCtx) -> Result<(), strata_connector::ConnectorError> {
            Ok(())
        }
    }

    fn registry() -> PendingDestroyRegistry {
        let mut registry = PendingDestroyRegistry::new();
        registry.register("test.Swap", || SwapAdapter);
        registry
    }

    #[test]
    fn apply_root_drains_a_deferred_replace_in_the_same_run() {
        let store = InMemoryStore::new();
        let provider = LocalProvider::default();
        let root = Uuid::new_v4();
        let registry = registry();

        let mut arena = Arena::new();
        arena.insert(Box::new(Resource::new(root, "$", SwapAdapter, Input { value: 1 }))).unwrap();
        apply_root(&mut arena, root, &provider, &store, &registry, false).unwrap();
        assert_eq!(store.get(root, false).unwrap().unwrap().output, serde_json::json!({"echoed": 1}));

        let mut arena = Arena::new();
        arena.insert(Box::new(Resource::new(root, "$", SwapAdapter, Input { value: 2 }))).unwrap();
        apply_root(&mut arena, root, &provider, &store, &registry, false).unwrap();

        assert_eq!(store.get(root, false).unwrap().unwrap().output, serde_json::json!({"echoed": 2}));
        assert!(store.list_pending_destroy().unwrap().is_empty());
    }

    #[test]
    fn destroy_root_removes_the_persisted_envelope() {
        let store = InMemoryStore::new();
        let provider = LocalProvider::default();
        let root = Uuid::new_v4();

        let mut arena = Arena::new();
        arena.insert(Box::new(Resource::new(root, "$", SwapAdapter, Input { value: 1 }))).unwrap();
        apply_root(&mut arena, root, &provider, &store, &registry(), false).unwrap();

        let mut arena = Arena::new();
        arena.insert(Box::new(Resource::new(root, "$", SwapAdapter, Input { value: 1 }))).unwrap();
        destroy_root(&mut arena, root, &provider, &store, false).unwrap();

        assert!(store.get(root, false).unwrap().is_none());
    }
}
