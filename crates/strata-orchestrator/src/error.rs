#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Resource(#[from] strata_resource::ResourceError),

    #[error(transparent)]
    Plan(#[from] strata_plan::PlanError),

    #[error(transparent)]
    Connector(#[from] strata_connector::ConnectorError),

    #[error(transparent)]
    Store(#[from] strata_state::StoreError),

    #[error("envelope (de)serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}
