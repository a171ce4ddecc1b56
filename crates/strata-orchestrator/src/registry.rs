use std::collections::HashMap;

use strata_provider::CloudProvider;
use strata_resource::{AdapterError, InvariantViolation, ResourceAdapter, ResourceError};
use strata_state::StateEnvelope;
use uuid::Uuid;

use crate::error::OrchestratorError;

type DestroyFn = Box<dyn Fn(&StateEnvelope, &dyn CloudProvider, Uuid, bool) -> Result<(), OrchestratorError> + Send + Sync>;

/// Draining a pending-destroy entry means instantiating a resource of its
/// recorded class from only the persisted input, with no access to the
/// declarative program that originally built it. This registry maps each
/// adapter's stable `class_tag` to a factory that reconstructs a fresh
/// adapter instance and drives its `destroy` hook — spec §9's "registry of
/// class-tag → constructor function".
#[derive(Default)]
pub struct PendingDestroyRegistry {
    factories: HashMap<&'static str, DestroyFn>,
}

impl PendingDestroyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers how to reconstruct and destroy resources of adapter `A`.
    /// `make_adapter` builds a fresh, unconfigured adapter instance — the
    /// same one every resource of this class_tag would use, since the
    /// adapter itself carries no per-resource state beyond its hooks.
    pub fn register<A>(&mut self, class_tag: &'static str, make_adapter: impl Fn() -> A + Send + Sync + 'static)
    where
        A: ResourceAdapter + 'static,
    {
        self.factories.insert(
            class_tag,
            Box::new(move |envelope, provider, apply_uuid, dry| {
                let mut adapter = make_adapter();
                let input: A::Input = serde_json::from_value(envelope.input.clone())?;
                match adapter.destroy(&input, provider, apply_uuid, dry) {
                    Ok(()) | Err(AdapterError::NotFound) => Ok(()),
                    Err(e) => Err(OrchestratorError::Resource(strata_resource::ResourceError::Adapter(e))),
                }
            }),
        );
    }

    pub fn destroy(
        &self,
        envelope: &StateEnvelope,
        provider: &dyn CloudProvider,
        apply_uuid: Uuid,
        dry: bool,
    ) -> Result<(), OrchestratorError> {
        let factory = self.factories.get(envelope.class_tag.as_str()).ok_or_else(|| {
            OrchestratorError::Resource(ResourceError::Invariant(InvariantViolation::UnknownClassTag(
                envelope.class_tag.clone(),
            )))
        })?;
        factory(envelope, provider, apply_uuid, dry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use strata_provider::LocalProvider;

    #[derive(Clone, Serialize, Deserialize)]
    struct Input {
        value: u32,
    }

    #[derive(Clone, Serialize, Deserialize, Default)]
    struct Output {
        echoed: u32,
    }

    struct StubAdapter;

    impl ResourceAdapter for StubAdapter {
        type Input = Input;
        type Output = Output;

        fn class_tag(&self) -> &'static str {
            "test.Stub"
        }

        fn create(&mut self, input: &Input, _tags: &strata_resource::SystemTags, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<Output, AdapterError> {
            Ok(Output { echoed: input.value })
        }

        fn update(&mut self, _i: &Input, _pi: &Input, _tags: &strata_resource::SystemTags, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<bool, AdapterError> {
            Ok(true)
        }

        fn destroy(&mut self, _pi: &Input, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<(), AdapterError> {
            Ok(())
        }

        fn is_drifted(&self, _o: &Output, _p: &dyn CloudProvider, _d: bool) -> Result<bool, AdapterError> {
            Ok(false)
        }

        fn input_dependencies(&self, _input: &Input) -> std::collections::HashSet<Uuid> {
            std::collections::HashSet::new()
        }

        fn resolve_input(&self, _input: &mut Input, _ctx: &dyn strata_connector::ResolveCtx) -> Result<(), strata_connector::ConnectorError> {
            Ok(())
        }
    }

    fn envelope_for(class_tag: &str) -> StateEnvelope {
        StateEnvelope::new(
            Uuid::new_v4(),
            "$",
            class_tag,
            serde_json::json!({"value": 7}),
            serde_json::json!({"echoed": 7}),
            Uuid::new_v4(),
        )
    }

    #[test]
    fn destroy_routes_to_the_factory_registered_for_the_envelopes_class_tag() {
        let mut registry = PendingDestroyRegistry::new();
        registry.register("test.Stub", || StubAdapter);
        let provider = LocalProvider::default();

        let result = registry.destroy(&envelope_for("test.Stub"), &provider, Uuid::new_v4(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn destroy_with_no_matching_factory_is_unregistered_class_tag() {
        let registry = PendingDestroyRegistry::new();
        let provider = LocalProvider::default();

        let err = registry.destroy(&envelope_for("test.Ghost"), &provider, Uuid::new_v4(), false).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Resource(ResourceError::Invariant(InvariantViolation::UnknownClassTag(tag))) if tag == "test.Ghost"
        ));
    }
}
