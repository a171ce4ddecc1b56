use std::collections::HashSet;

use strata_resource::{Arena, RunContext};
use tracing::debug;
use uuid::Uuid;

use crate::error::PlanError;

/// Dependency-first apply of the subtree rooted at `uuid`: every node this
/// one depends on (transitively) applies first, then — for a Plan — every
/// child in declaration order, and only then the node's own `apply_self`.
/// `visited` dedupes nodes reachable through more than one edge so a
/// diamond dependency only applies once.
pub fn apply_node(
    arena: &mut Arena,
    uuid: Uuid,
    ctx: &RunContext<'_>,
    visited: &mut HashSet<Uuid>,
) -> Result<(), PlanError> {
    if visited.contains(&uuid) {
        return Ok(());
    }
    visited.insert(uuid);

    let dependencies: Vec<Uuid> = arena
        .get(uuid)
        .map(|node| node.dependencies().iter().copied().collect())
        .unwrap_or_default();
    for dep in dependencies {
        apply_node(arena, dep, ctx, visited)?;
    }

    let children: Vec<Uuid> = arena.get(uuid).map(|node| node.children().to_vec()).unwrap_or_default();
    for child in children {
        apply_node(arena, child, ctx, visited)?;
    }

    let Some(mut node) = arena.take(uuid) else {
        return Ok(());
    };
    debug!(%uuid, class = node.class_tag(), "applying node");
    let result = node.apply_self(ctx, arena);
    match result {
        Ok(output) => {
            arena.put_back(node);
            arena.set_output(uuid, output);
            Ok(())
        }
        Err(err) => {
            arena.put_back(node);
            Err(err.into())
        }
    }
}

/// Full-tree destroy of the subtree rooted at `uuid`: dependents are
/// destroyed first (external pressure before the thing they depend on),
/// skipping only the direct back-reference to this node's owning Plan
/// (spec §9 open question b — further ancestors are not skipped), then
/// children leaf-first, then this node's own envelope.
///
/// Used for an explicit destroy; pending-destroy drain calls
/// `strata_resource::destroy_resource` directly instead, bypassing this
/// traversal entirely (a deferred-destroy entry has no dependents left to
/// consider).
pub fn destroy_node(
    arena: &mut Arena,
    uuid: Uuid,
    ctx: &RunContext<'_>,
    visited: &mut HashSet<Uuid>,
) -> Result<(), PlanError> {
    if visited.contains(&uuid) {
        return Ok(());
    }
    visited.insert(uuid);

    let (dependents, owning_plan): (Vec<Uuid>, Option<Uuid>) = match arena.get(uuid) {
        Some(node) => (node.dependents().iter().copied().collect(), node.plan_uuid()),
        None => return Ok(()),
    };
    for dependent in dependents {
        if Some(dependent) == owning_plan {
            continue;
        }
        destroy_node(arena, dependent, ctx, visited)?;
    }

    let children: Vec<Uuid> = arena.get(uuid).map(|node| node.children().to_vec()).unwrap_or_default();
    for child in children {
        destroy_node(arena, child, ctx, visited)?;
    }

    let Some(mut node) = arena.take(uuid) else {
        return Ok(());
    };
    debug!(%uuid, class = node.class_tag(), "destroying node");
    let result = node.destroy_self(ctx);
    arena.put_back(node);
    result.map_err(PlanError::from)
}
