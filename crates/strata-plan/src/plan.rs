use std::collections::HashSet;

use serde_json::Value;
use strata_connector::ResolveCtx;
use strata_resource::{join_path, sub_uuid, Arena, ResourceError, ResourceNode, RunContext, SystemTags};
use strata_state::StateEnvelope;
use uuid::Uuid;

use crate::adapter::PlanAdapter;
use crate::error::PlanError;

/// A composite Resource that owns a tree of children, derives their
/// identities, and exposes its own typed Input/Output (spec §4.3). Nesting
/// falls out for free: a `Plan<A>` implements `ResourceNode` exactly like
/// a leaf `Resource<A>`, so a Plan may itself be a child of another Plan.
pub struct Plan<A: PlanAdapter> {
    uuid: Uuid,
    path: String,
    adapter: A,
    input: A::Input,
    output: Option<A::Output>,
    dependencies: HashSet<Uuid>,
    dependents: HashSet<Uuid>,
    plan_uuid: Option<Uuid>,
    plan_class_tag: Option<String>,
    applied: bool,
    children: Vec<Uuid>,
}

impl<A: PlanAdapter> Plan<A> {
    /// `uuid` is the root uuid supplied by the caller for a top-level
    /// Plan, or a placeholder overwritten by `set_identity` when this Plan
    /// is itself a child constructed inside another Plan's
    /// `init_resources`. Registers every child this Plan declares into
    /// `arena`, deriving each child's uuid from `sub_uuid(self.uuid,
    /// child.class_tag(), path_segment)`.
    pub fn new(uuid: Uuid, path: impl Into<String>, adapter: A, input: A::Input, arena: &mut Arena) -> Result<Self, PlanError> {
        let path = path.into();
        let dependencies = adapter.input_dependencies(&input);
        let class_tag = adapter.class_tag();
        let declared = adapter.init_resources(&input, uuid, arena);

        let mut children = Vec::with_capacity(declared.len());
        for (segment, mut child) in declared {
            let child_uuid = sub_uuid(uuid, child.class_tag(), &segment);
            let child_path = join_path(&path, &segment);
            child.set_identity(child_uuid, child_path, uuid, class_tag.to_string());
            children.push(child_uuid);
            arena.insert(child)?;
        }

        Ok(Self {
            uuid,
            path,
            adapter,
            input,
            output: None,
            dependencies,
            dependents: HashSet::new(),
            plan_uuid: None,
            plan_class_tag: None,
            applied: false,
            children,
        })
    }

    pub fn input(&self) -> &A::Input {
        &self.input
    }

    pub fn output(&self) -> Option<&A::Output> {
        self.output.as_ref()
    }
}

impl<A: PlanAdapter> ResourceNode for Plan<A> {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn class_tag(&self) -> &'static str {
        self.adapter.class_tag()
    }

    fn plan_uuid(&self) -> Option<Uuid> {
        self.plan_uuid
    }

    fn set_identity(&mut self, uuid: Uuid, path: String, plan_uuid: Uuid, plan_class_tag: String) {
        self.uuid = uuid;
        self.path = path;
        self.plan_uuid = Some(plan_uuid);
        self.plan_class_tag = Some(plan_class_tag);
    }

    fn dependencies(&self) -> &HashSet<Uuid> {
        &self.dependencies
    }

    fn add_dependency(&mut self, dep: Uuid) {
        self.dependencies.insert(dep);
    }

    fn dependents(&self) -> &HashSet<Uuid> {
        &self.dependents
    }

    fn add_dependent(&mut self, dep: Uuid) {
        self.dependents.insert(dep);
    }

    fn applied(&self) -> bool {
        self.applied
    }

    fn reset_applied(&mut self) {
        self.applied = false;
    }

    fn children(&self) -> &[Uuid] {
        &self.children
    }

    fn system_tags(&self, root_plan_uuid: Uuid, root_plan_class_tag: &str) -> SystemTags {
        SystemTags {
            uuid: self.uuid,
            class_tag: self.adapter.class_tag().to_string(),
            plan_uuid: self.plan_uuid,
            plan_class_tag: self.plan_class_tag.clone(),
            root_plan_uuid,
            root_plan_class_tag: root_plan_class_tag.to_string(),
        }
    }

    /// No create/update/destroy of its own: resolve the Plan's input,
    /// compose its output from already-applied children (the traversal in
    /// `crate::traversal` guarantees children ran first), and persist a
    /// bookkeeping envelope.
    fn apply_self(&mut self, ctx: &RunContext<'_>, resolve: &dyn ResolveCtx) -> Result<Value, ResourceError> {
        self.adapter.resolve_input(&mut self.input, resolve)?;
        let output = self.adapter.compose_output(&self.input, self.uuid, resolve)?;

        let mut envelope = StateEnvelope::new(
            self.uuid,
            &self.path,
            self.adapter.class_tag(),
            serde_json::to_value(&self.input)?,
            serde_json::to_value(&output)?,
            ctx.apply_uuid,
        );
        if let (Some(plan_uuid), Some(plan_class_tag)) = (self.plan_uuid, &self.plan_class_tag) {
            envelope = envelope.with_plan(plan_uuid, plan_class_tag.clone());
        }
        ctx.store.put(self.uuid, envelope)?;

        let value = serde_json::to_value(&output)?;
        self.output = Some(output);
        self.applied = true;
        Ok(value)
    }

    fn destroy_self(&mut self, ctx: &RunContext<'_>) -> Result<(), ResourceError> {
        ctx.store.delete(self.uuid, false)?;
        self.applied = false;
        self.output = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use strata_connector::ConnectorError;
    use strata_provider::{CloudProvider, LocalProvider};
    use strata_resource::{AdapterError, Resource, ResourceAdapter};
    use strata_state::InMemoryStore;

    #[derive(Clone, Serialize, Deserialize)]
    struct LeafInput {
        value: u32,
    }

    #[derive(Clone, Serialize, Deserialize, Default)]
    struct LeafOutput {
        echoed: u32,
    }

    struct LeafAdapter;

    impl ResourceAdapter for LeafAdapter {
        type Input = LeafInput;
        type Output = LeafOutput;

        fn class_tag(&self) -> &'static str {
            "test.Leaf"
        }

        fn create(&mut self, input: &LeafInput, _tags: &SystemTags, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<LeafOutput, AdapterError> {
            Ok(LeafOutput { echoed: input.value })
        }

        fn update(&mut self, _i: &LeafInput, _pi: &LeafInput, _tags: &SystemTags, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<bool, AdapterError> {
            Ok(true)
        }

        fn destroy(&mut self, _pi: &LeafInput, _p: &dyn CloudProvider, _a: Uuid, _d: bool) -> Result<(), AdapterError> {
            Ok(())
        }

        fn is_drifted(&self, _o: &LeafOutput, _p: &dyn CloudProvider, _d: bool) -> Result<bool, AdapterError> {
            Ok(false)
        }

        fn input_dependencies(&self, _input: &LeafInput) -> HashSet<Uuid> {
            HashSet::new()
        }

        fn resolve_input(&self, _input: &mut LeafInput, _ctx: &dyn strata_connector::ResolveCtx) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    #[derive(Clone, Serialize, Deserialize)]
    struct OneChildPlanInput {
        leaf_value: u32,
    }

    #[derive(Clone, Serialize, Deserialize, Default)]
    struct OneChildPlanOutput {
        leaf_echoed: u32,
    }

    struct OneChildPlanAdapter;

    impl PlanAdapter for OneChildPlanAdapter {
        type Input = OneChildPlanInput;
        type Output = OneChildPlanOutput;

        fn class_tag(&self) -> &'static str {
            "test.Plan"
        }

        fn input_dependencies(&self, _input: &OneChildPlanInput) -> HashSet<Uuid> {
            HashSet::new()
        }

        fn resolve_input(&self, _input: &mut OneChildPlanInput, _ctx: &dyn ResolveCtx) -> Result<(), ConnectorError> {
            Ok(())
        }

        fn init_resources(
            &self,
            input: &OneChildPlanInput,
            _plan_uuid: Uuid,
            _arena: &mut Arena,
        ) -> Vec<(String, Box<dyn ResourceNode>)> {
            let leaf = Resource::pending(LeafAdapter, LeafInput { value: input.leaf_value });
            vec![("leaf".to_string(), Box::new(leaf))]
        }

        fn compose_output(
            &self,
            _input: &OneChildPlanInput,
            plan_uuid: Uuid,
            children: &dyn ResolveCtx,
        ) -> Result<OneChildPlanOutput, ConnectorError> {
            let leaf_uuid = sub_uuid(plan_uuid, "test.Leaf", "leaf");
            let echoed = strata_connector::Connector::<u32>::of(leaf_uuid).field("echoed").resolve(children)?;
            Ok(OneChildPlanOutput { leaf_echoed: echoed })
        }
    }

    fn fixture() -> (Arena, Uuid) {
        let root = Uuid::new_v4();
        let mut arena = Arena::new();
        let plan = Plan::new(root, "$", OneChildPlanAdapter, OneChildPlanInput { leaf_value: 9 }, &mut arena).unwrap();
        arena.insert(Box::new(plan)).unwrap();
        arena.wire_dependents();
        (arena, root)
    }

    #[test]
    fn new_rejects_a_child_whose_derived_uuid_collides_with_an_existing_node() {
        let root = Uuid::new_v4();
        let mut arena = Arena::new();
        let leaf_uuid = sub_uuid(root, "test.Leaf", "leaf");
        arena.insert(Box::new(Resource::new(leaf_uuid, "$.leaf", LeafAdapter, LeafInput { value: 1 }))).unwrap();

        let err = Plan::new(root, "$", OneChildPlanAdapter, OneChildPlanInput { leaf_value: 9 }, &mut arena).unwrap_err();
        assert!(matches!(err, PlanError::Resource(strata_resource::ResourceError::Invariant(_))));
    }

    #[test]
    fn construction_derives_and_registers_the_declared_child() {
        let (arena, root) = fixture();
        let plan_node = arena.get(root).unwrap();
        assert_eq!(plan_node.children().len(), 1);

        let leaf_uuid = sub_uuid(root, "test.Leaf", "leaf");
        assert_eq!(plan_node.children()[0], leaf_uuid);
        assert!(arena.contains(leaf_uuid));

        let leaf_node = arena.get(leaf_uuid).unwrap();
        assert_eq!(leaf_node.path(), "$.leaf");
        assert_eq!(leaf_node.plan_uuid(), Some(root));
    }

    #[test]
    fn apply_self_composes_output_from_already_applied_children() {
        let (mut arena, root) = fixture();
        let store = InMemoryStore::new();
        let provider = LocalProvider::default();
        let leaf_uuid = sub_uuid(root, "test.Leaf", "leaf");

        let ctx = RunContext { provider: &provider, store: &store, apply_uuid: Uuid::new_v4(), dry: false, root_plan_uuid: root, root_plan_class_tag: "test.Plan" };

        // Children apply before the Plan — the traversal in `crate::traversal`
        // guarantees this ordering; exercised directly here for a unit test.
        let mut leaf = arena.take(leaf_uuid).unwrap();
        let leaf_output = leaf.apply_self(&ctx, &arena).unwrap();
        arena.put_back(leaf);
        arena.set_output(leaf_uuid, leaf_output);

        let mut plan = arena.take(root).unwrap();
        let plan_output = plan.apply_self(&ctx, &arena).unwrap();
        arena.put_back(plan);

        assert_eq!(plan_output, serde_json::json!({"leaf_echoed": 9}));

        let envelope = store.get(root, false).unwrap().unwrap();
        assert_eq!(envelope.output, serde_json::json!({"leaf_echoed": 9}));
        assert_eq!(envelope.class_tag, "test.Plan");
    }

    #[test]
    fn destroy_self_deletes_its_own_envelope_but_not_children() {
        let (mut arena, root) = fixture();
        let store = InMemoryStore::new();
        let provider = LocalProvider::default();
        let ctx = RunContext { provider: &provider, store: &store, apply_uuid: Uuid::new_v4(), dry: false, root_plan_uuid: root, root_plan_class_tag: "test.Plan" };

        let mut plan = arena.take(root).unwrap();
        plan.apply_self(&ctx, &arena).unwrap();
        assert!(store.get(root, false).unwrap().is_some());

        plan.destroy_self(&ctx).unwrap();
        arena.put_back(plan);
        assert!(store.get(root, false).unwrap().is_none());
    }
}
