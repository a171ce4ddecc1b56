#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no client configured for service '{0}'")]
    UnconfiguredService(String),

    #[error("timed out waiting for predicate to settle")]
    Timeout,
}
