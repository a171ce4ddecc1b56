use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no envelope for {0}")]
    NotFound(Uuid),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("state file io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not acquire state file lock")]
    LockConflict,
}
