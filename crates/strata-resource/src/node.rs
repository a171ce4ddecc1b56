use std::collections::{HashMap, HashSet};

use serde_json::Value;
use strata_connector::ResolveCtx;
use uuid::Uuid;

use crate::error::{InvariantViolation, ResourceError};
use crate::tags::SystemTags;

/// Shared, per-run context threaded through every node's apply/destroy
/// call: the provider, the state store, the identifiers for this run, and
/// whether this is a dry run. `strata-orchestrator` owns construction.
pub struct RunContext<'a> {
    pub provider: &'a dyn strata_provider::CloudProvider,
    pub store: &'a dyn strata_state::StateStore,
    pub apply_uuid: Uuid,
    pub dry: bool,
    pub root_plan_uuid: Uuid,
    pub root_plan_class_tag: &'static str,
}

/// Type-erased operations the engine needs on every arena entry, whether
/// it is a leaf `Resource<A>` or a composite `Plan<A>`. Dyn-safe so the
/// arena can hold a uniform `Box<dyn ResourceNode>` regardless of each
/// node's concrete Input/Output types.
pub trait ResourceNode: Send + Sync {
    fn uuid(&self) -> Uuid;
    fn path(&self) -> &str;
    fn class_tag(&self) -> &'static str;

    /// The owning Plan's uuid, if this node is a child of one. `None` at
    /// the root.
    fn plan_uuid(&self) -> Option<Uuid>;

    /// Called once by the owning Plan's constructor, after the child's
    /// deterministic uuid has been derived (spec §4.3 Construction).
    fn set_identity(&mut self, uuid: Uuid, path: String, plan_uuid: Uuid, plan_class_tag: String);

    fn dependencies(&self) -> &HashSet<Uuid>;
    fn add_dependency(&mut self, dep: Uuid);

    fn dependents(&self) -> &HashSet<Uuid>;
    fn add_dependent(&mut self, dep: Uuid);

    fn applied(&self) -> bool;
    fn reset_applied(&mut self);

    /// Ordered child uuids in declaration order; empty for a leaf Resource.
    fn children(&self) -> &[Uuid];

    fn system_tags(&self, root_plan_uuid: Uuid, root_plan_class_tag: &str) -> SystemTags;

    /// Run this node's own envelope read/resolve/create-or-update/persist
    /// step (spec §4.2's default apply algorithm). Does not recurse into
    /// children or dependencies — the traversal in `strata-plan` handles
    /// ordering; this is the leaf action at one node.
    fn apply_self(&mut self, ctx: &RunContext<'_>, resolve: &dyn ResolveCtx) -> Result<Value, ResourceError>;

    /// Destroy this node's own persisted envelope. Does not traverse
    /// dependents or children.
    fn destroy_self(&mut self, ctx: &RunContext<'_>) -> Result<(), ResourceError>;
}

/// Arena of resource nodes keyed by uuid, plus a separate map of resolved
/// outputs. Splitting outputs out of the node map means a node can be
/// temporarily removed (`take`) for its own mutable apply call while
/// `ResolveCtx` lookups against sibling outputs keep working — the arena
/// never needs a node to borrow itself.
///
/// Edges between nodes are uuid keys, never direct references — this is
/// how the engine avoids the Plan/child reference cycle.
#[derive(Default)]
pub struct Arena {
    nodes: HashMap<Uuid, Box<dyn ResourceNode>>,
    outputs: HashMap<Uuid, Value>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two distinct nodes deriving the same identity is
    /// `InvariantViolation::DuplicateUuid` (spec §7) — a programming error
    /// in the declarative tree, fatal but not a panic: the caller aborts
    /// the apply and the arena is left with whatever was inserted before
    /// this call, never silently clobbered.
    pub fn insert(&mut self, node: Box<dyn ResourceNode>) -> Result<(), ResourceError> {
        let uuid = node.uuid();
        if self.nodes.contains_key(&uuid) {
            return Err(ResourceError::Invariant(InvariantViolation::DuplicateUuid(uuid)));
        }
        self.nodes.insert(uuid, node);
        Ok(())
    }

    pub fn take(&mut self, uuid: Uuid) -> Option<Box<dyn ResourceNode>> {
        self.nodes.remove(&uuid)
    }

    pub fn put_back(&mut self, node: Box<dyn ResourceNode>) {
        self.nodes.insert(node.uuid(), node);
    }

    pub fn get(&self, uuid: Uuid) -> Option<&dyn ResourceNode> {
        self.nodes.get(&uuid).map(|b| b.as_ref())
    }

    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut Box<dyn ResourceNode>> {
        self.nodes.get_mut(&uuid)
    }

    pub fn set_output(&mut self, uuid: Uuid, output: Value) {
        self.outputs.insert(uuid, output);
    }

    pub fn reset_all_applied(&mut self) {
        for node in self.nodes.values_mut() {
            node.reset_applied();
        }
    }

    pub fn contains(&self, uuid: Uuid) -> bool {
        self.nodes.contains_key(&uuid)
    }

    /// Recomputes every node's `dependents` set as the inverse of its
    /// `dependencies` set. Idempotent; call after construction and before
    /// any traversal, since dependency edges can only be added, never
    /// removed, after a node joins the arena.
    pub fn wire_dependents(&mut self) {
        let edges: Vec<(Uuid, Uuid)> = self
            .nodes
            .values()
            .flat_map(|node| {
                let uuid = node.uuid();
                node.dependencies().iter().map(move |&dep| (dep, uuid))
            })
            .collect();

        for (producer, dependent) in edges {
            if let Some(node) = self.nodes.get_mut(&producer) {
                node.add_dependent(dependent);
            }
        }
    }

    pub fn uuids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.nodes.keys().copied()
    }
}

impl ResolveCtx for Arena {
    fn output_of(&self, producer: Uuid) -> Option<&Value> {
        self.outputs.get(&producer)
    }
}
