use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// A Connector was resolved before its root producer had applied.
    #[error("unresolved producer: {0} has not applied yet")]
    UnresolvedProducer(Uuid),

    #[error("field '{0}' not found on producer output")]
    MissingField(String),

    #[error("failed to deserialize resolved value: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("connector computation failed: {0}")]
    ComputeFailed(String),
}
