//! Illustrative AWS-style resource adapters (Vpc, Subnet, SecurityGroup)
//! wired into a single demo Network plan, plus the construction and
//! destroy-registry glue an embedding program needs to drive them through
//! `strata-orchestrator`. Stands in for the "concrete AWS adapters" spec.md
//! names as an external collaborator — exercised here only so the engine
//! is testable end to end, the same way the teacher's `LocalDriver` stands
//! in for a real cloud SDK.

mod network;
mod security_group;
mod subnet;
mod vpc;

use uuid::Uuid;

use strata_connector::Bound;
use strata_orchestrator::PendingDestroyRegistry;
use strata_resource::Arena;
use strata_state::StateStore;

pub use network::{NetworkPlanAdapter, NetworkPlanInput, NetworkPlanOutput};
pub use security_group::{SecurityGroupAdapter, SecurityGroupInput, SecurityGroupOutput};
pub use subnet::{SubnetAdapter, SubnetInput, SubnetOutput};
pub use vpc::{VpcAdapter, VpcInput, VpcOutput};

/// Root uuid for the demo Network plan. Constant per Plan class, per
/// spec.md §6 ("Root UUID is supplied by the caller") — a real program
/// would bake one of these per top-level Plan it declares.
pub const ROOT_UUID: Uuid = Uuid::from_u128(0x5f3a_0a00_0000_4000_8000_0000_0000_0001);

/// The declarative input a demo run applies against. A real caller would
/// parse this from config; here it is fixed so `strata-cli`'s apply/
/// destroy/status subcommands have something concrete to reconcile.
pub fn demo_input() -> NetworkPlanInput {
    NetworkPlanInput {
        cidr_block: Bound::concrete("10.0.0.0/16".to_string()),
        subnet_cidr_block: Bound::concrete("10.0.1.0/24".to_string()),
        availability_zone: "us-east-1a".to_string(),
        ingress_ports: vec![22, 443],
    }
}

/// Constructs the demo Network plan under `ROOT_UUID`, registering every
/// child resource it declares into `arena`. Mirrors spec.md §4.3's
/// construction step: `strata_plan::Plan::new` derives and assigns every
/// child's uuid/path before this call returns.
pub fn build(
    arena: &mut Arena,
    input: NetworkPlanInput,
) -> Result<strata_plan::Plan<NetworkPlanAdapter>, strata_plan::PlanError> {
    strata_plan::Plan::new(ROOT_UUID, "$", NetworkPlanAdapter, input, arena)
}

/// Registers every demo adapter's class_tag with a destroy factory, so a
/// pending-destroy drain can reconstruct and destroy a resource of that
/// class from only its persisted input (spec.md §9, "registry of
/// class-tag → constructor function").
pub fn registry() -> PendingDestroyRegistry {
    let mut registry = PendingDestroyRegistry::new();
    registry.register("demo.Vpc", VpcAdapter::default);
    registry.register("demo.Subnet", SubnetAdapter::default);
    registry.register("demo.SecurityGroup", SecurityGroupAdapter::default);
    registry
}

/// Convenience for tests and the CLI's `status` subcommand: reads the
/// persisted envelope for a child of the demo Network plan by its adapter
/// class tag and declared path segment.
pub fn child_uuid(class_tag: &'static str, path_segment: &str) -> Uuid {
    strata_resource::sub_uuid(ROOT_UUID, class_tag, path_segment)
}

/// One full apply of the demo plan against `store`/`provider`, returning
/// the `apply_uuid` the run was attributed to.
pub fn apply_once(
    store: &dyn StateStore,
    provider: &dyn strata_provider::CloudProvider,
    input: NetworkPlanInput,
    dry: bool,
) -> Result<Uuid, strata_orchestrator::OrchestratorError> {
    let mut arena = Arena::new();
    let root = build(&mut arena, input)?;
    arena.insert(Box::new(root))?;
    let registry = registry();
    strata_orchestrator::apply_root(&mut arena, ROOT_UUID, provider, store, &registry, dry)
}

/// One full destroy of the demo plan against `store`/`provider`.
pub fn destroy_once(
    store: &dyn StateStore,
    provider: &dyn strata_provider::CloudProvider,
    input: NetworkPlanInput,
    dry: bool,
) -> Result<Uuid, strata_orchestrator::OrchestratorError> {
    let mut arena = Arena::new();
    let root = build(&mut arena, input)?;
    arena.insert(Box::new(root))?;
    strata_orchestrator::destroy_root(&mut arena, ROOT_UUID, provider, store, dry)
}
