/// Crate-boundary error for `strata-plan`: construction (`Plan::new`
/// deriving a duplicate child uuid) and traversal (`apply_node`/
/// `destroy_node`) both bottom out in a `strata_resource::ResourceError`;
/// this wraps it the way `strata_orchestrator::OrchestratorError` wraps
/// this crate in turn.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Resource(#[from] strata_resource::ResourceError),
}
