use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_connector::{ConnectorError, ResolveCtx};
use strata_resource::{Arena, ResourceNode};
use uuid::Uuid;

/// A Plan declares its children and how its own Output is composed from
/// them; it has no create/update/destroy hooks of its own since a Plan
/// corresponds to no single remote object — it is purely a composition
/// boundary (spec §4.3).
pub trait PlanAdapter: Send + Sync {
    type Input: Serialize + DeserializeOwned + Clone + Send + Sync;
    type Output: Serialize + DeserializeOwned + Clone + Default + Send + Sync;

    fn class_tag(&self) -> &'static str;

    /// See `ResourceAdapter::input_dependencies` — same contract, applied
    /// to the Plan's own Input rather than a leaf resource's.
    fn input_dependencies(&self, input: &Self::Input) -> HashSet<Uuid>;

    fn resolve_input(&self, input: &mut Self::Input, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError>;

    /// Enumerate children in declaration order, keyed by path segment.
    /// Called once during Plan construction; the engine derives each
    /// child's uuid/path/plan back-reference afterward and inserts it into
    /// `arena`. Nested Plans are constructed recursively here (a nested
    /// Plan's own `Plan::new` call registers its own children into the
    /// same shared `arena`).
    ///
    /// `plan_uuid` is this Plan's own (already-assigned) uuid — declarative
    /// code that wires a Connector from one sibling to another needs the
    /// producer's final uuid up front, and since identities are derived via
    /// `sub_uuid(plan_uuid, child.class_tag(), path_segment)`, the adapter
    /// can predict a not-yet-constructed sibling's uuid with the same
    /// formula the engine will use.
    fn init_resources(
        &self,
        input: &Self::Input,
        plan_uuid: Uuid,
        arena: &mut Arena,
    ) -> Vec<(String, Box<dyn ResourceNode>)>;

    /// Build this Plan's own Output once every child has applied —
    /// typically a handful of Connectors pointing at children's outputs.
    /// `plan_uuid` is passed for the same reason as in `init_resources`:
    /// re-deriving a child's uuid to address its output.
    fn compose_output(
        &self,
        input: &Self::Input,
        plan_uuid: Uuid,
        children: &dyn ResolveCtx,
    ) -> Result<Self::Output, ConnectorError>;
}
