//! End-to-end scenarios from spec.md §8, driven against the real demo
//! Network plan (Vpc → Subnet/SecurityGroup) rather than a synthetic
//! adapter. Engine-level universal invariants are covered inline in
//! `strata-resource`/`strata-state`; these exercise the same algorithm
//! through a realistic dependency graph with Connectors doing the wiring.

use strata_connector::Bound;
use strata_provider::LocalProvider;
use strata_resource::Arena;
use strata_state::{FileStateStore, InMemoryStore, StateStore};
use strata_demo_aws::{apply_once, build, child_uuid, demo_input, destroy_once, NetworkPlanInput, ROOT_UUID};

fn input_with(cidr: &str, subnet_cidr: &str, ports: Vec<u16>) -> NetworkPlanInput {
    NetworkPlanInput {
        cidr_block: Bound::concrete(cidr.to_string()),
        subnet_cidr_block: Bound::concrete(subnet_cidr.to_string()),
        availability_zone: "us-east-1a".to_string(),
        ingress_ports: ports,
    }
}

fn apply(store: &dyn StateStore, provider: &LocalProvider, input: NetworkPlanInput) -> uuid::Uuid {
    apply_once(store, provider, input, false).unwrap()
}

fn vpc_id_in_state(store: &dyn StateStore) -> String {
    let uuid = child_uuid("demo.Vpc", "vpc");
    let envelope = store.get(uuid, false).unwrap().unwrap();
    envelope.output["vpc_id"].as_str().unwrap().to_string()
}

fn subnet_id_in_state(store: &dyn StateStore) -> String {
    let uuid = child_uuid("demo.Subnet", "subnet");
    let envelope = store.get(uuid, false).unwrap().unwrap();
    envelope.output["subnet_id"].as_str().unwrap().to_string()
}

fn security_group_id_in_state(store: &dyn StateStore) -> String {
    let uuid = child_uuid("demo.SecurityGroup", "security_group");
    let envelope = store.get(uuid, false).unwrap().unwrap();
    envelope.output["group_id"].as_str().unwrap().to_string()
}

// S1 — create then no-op: a second apply with identical input must not
// re-create anything. Adapters mint ids from the run's apply_uuid, so an
// unchanged id across two applies proves create did not run again.
#[test]
fn s1_create_then_noop_reuses_existing_ids() {
    let store = InMemoryStore::new();
    let provider = LocalProvider::default();

    apply(&store, &provider, demo_input());
    let vpc_id_first = vpc_id_in_state(&store);
    let subnet_id_first = subnet_id_in_state(&store);

    apply(&store, &provider, demo_input());
    assert_eq!(vpc_id_in_state(&store), vpc_id_first);
    assert_eq!(subnet_id_in_state(&store), subnet_id_first);
    assert!(store.list_pending_destroy().unwrap().is_empty());
}

// S2 — replace with create-before-destroy: Subnet declares
// `create_before_destroy = true`, so changing its cidr block creates the
// replacement before the old one is destroyed; the drain at the end of
// apply_root clears the pending-destroy entry it emitted.
#[test]
fn s2_subnet_replace_defers_then_drains_old_envelope() {
    let store = InMemoryStore::new();
    let provider = LocalProvider::default();

    apply(&store, &provider, input_with("10.0.0.0/16", "10.0.1.0/24", vec![22]));
    let subnet_id_first = subnet_id_in_state(&store);

    apply(&store, &provider, input_with("10.0.0.0/16", "10.0.2.0/24", vec![22]));
    let subnet_id_second = subnet_id_in_state(&store);

    assert_ne!(subnet_id_first, subnet_id_second);
    assert!(store.list_pending_destroy().unwrap().is_empty());
}

// S3 — replace inline: Vpc declares `create_before_destroy = false`
// (the default), so changing the cidr block destroys the old instance
// inline and emits no pending-destroy entry at any point.
#[test]
fn s3_vpc_replace_is_inline_with_no_pending_entry() {
    let store = InMemoryStore::new();
    let provider = LocalProvider::default();

    apply(&store, &provider, input_with("10.0.0.0/16", "10.0.1.0/24", vec![22]));
    let vpc_id_first = vpc_id_in_state(&store);

    apply(&store, &provider, input_with("10.1.0.0/16", "10.0.1.0/24", vec![22]));
    let vpc_id_second = vpc_id_in_state(&store);

    assert_ne!(vpc_id_first, vpc_id_second);
    assert!(store.list_pending_destroy().unwrap().is_empty());
}

// S4 — in-place update success: SecurityGroup's `update` returns true
// when only the ingress ports change (vpc_id is untouched), so the group
// id must be stable across the change.
#[test]
fn s4_security_group_ingress_change_updates_in_place() {
    let store = InMemoryStore::new();
    let provider = LocalProvider::default();

    apply(&store, &provider, input_with("10.0.0.0/16", "10.0.1.0/24", vec![22]));
    let group_id_first = security_group_id_in_state(&store);

    apply(&store, &provider, input_with("10.0.0.0/16", "10.0.1.0/24", vec![22, 443, 8080]));
    let group_id_second = security_group_id_in_state(&store);

    assert_eq!(group_id_first, group_id_second);
}

// S6 — deferred connector value: the Subnet and SecurityGroup both wire
// `vpc_id` through a Connector over the Vpc's output; by the time their
// own envelopes are persisted, that value must match the Vpc's own
// persisted output exactly (the Vpc applied first).
#[test]
fn s6_connector_wired_vpc_id_matches_vpc_output() {
    let store = InMemoryStore::new();
    let provider = LocalProvider::default();

    apply(&store, &provider, demo_input());

    let vpc_id = vpc_id_in_state(&store);
    let subnet_envelope = store.get(child_uuid("demo.Subnet", "subnet"), false).unwrap().unwrap();
    let sg_envelope = store.get(child_uuid("demo.SecurityGroup", "security_group"), false).unwrap().unwrap();

    assert_eq!(subnet_envelope.input["vpc_id"].as_str().unwrap(), vpc_id);
    assert_eq!(sg_envelope.input["vpc_id"].as_str().unwrap(), vpc_id);
}

// Testable property 6: destroying the Plan removes every child envelope
// it transitively owns, then its own.
#[test]
fn destroying_the_plan_removes_every_child_envelope_and_its_own() {
    let store = InMemoryStore::new();
    let provider = LocalProvider::default();
    apply(&store, &provider, demo_input());
    destroy_once(&store, &provider, demo_input(), false).unwrap();

    assert!(store.get(ROOT_UUID, false).unwrap().is_none());
    assert!(store.get(child_uuid("demo.Vpc", "vpc"), false).unwrap().is_none());
    assert!(store.get(child_uuid("demo.Subnet", "subnet"), false).unwrap().is_none());
    assert!(store.get(child_uuid("demo.SecurityGroup", "security_group"), false).unwrap().is_none());
}

// Testable property 1: derived uuids are stable across independent
// constructions of the same Plan with identical declarative input.
#[test]
fn derived_child_uuids_are_stable_across_constructions() {
    let mut arena_a = Arena::new();
    let root_a = build(&mut arena_a, demo_input()).unwrap();
    let mut arena_b = Arena::new();
    let root_b = build(&mut arena_b, demo_input()).unwrap();

    assert_eq!(
        strata_resource::ResourceNode::uuid(&root_a),
        strata_resource::ResourceNode::uuid(&root_b)
    );
    assert_eq!(child_uuid("demo.Vpc", "vpc"), child_uuid("demo.Vpc", "vpc"));
}

// Exercises the same apply/destroy cycle against the file-backed state
// store (the backend `strata-cli` actually drives) rather than the
// in-memory one, proving the demo plan round-trips through a real
// envelope file and advisory file lock, not just the test double.
#[test]
fn apply_then_destroy_round_trips_through_the_file_backed_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("state.json"));
    let provider = LocalProvider::default();

    apply_once(&store, &provider, demo_input(), false).unwrap();
    assert!(store.get(ROOT_UUID, false).unwrap().is_some());
    assert!(store.get(child_uuid("demo.Vpc", "vpc"), false).unwrap().is_some());

    destroy_once(&store, &provider, demo_input(), false).unwrap();
    assert!(store.get(ROOT_UUID, false).unwrap().is_none());
}
