use std::any::Any;

use crate::error::ProviderError;
use crate::provider::CloudProvider;

/// Opaque local client/resource handle: just the endpoint it would talk
/// to. Adapters that run against `LocalProvider` are expected to downcast
/// to this and issue requests directly (e.g. against a LocalStack-style
/// endpoint), performing no real cloud I/O.
#[derive(Debug, Clone)]
pub struct LocalHandle {
    pub endpoint: String,
    pub service: String,
}

/// Reference local-testing provider: every service name resolves to the
/// same single endpoint URL. Grounded on the pattern of routing every AWS
/// service's endpoint override at a LocalStack instance.
pub struct LocalProvider {
    endpoint: String,
}

impl LocalProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new("http://localhost:4566")
    }
}

impl CloudProvider for LocalProvider {
    fn client(&self, service: &str) -> Result<Box<dyn Any>, ProviderError> {
        Ok(Box::new(LocalHandle { endpoint: self.endpoint.clone(), service: service.to_string() }))
    }

    fn resource(&self, service: &str) -> Result<Box<dyn Any>, ProviderError> {
        self.client(service)
    }

    fn endpoint(&self, _service: &str) -> Option<String> {
        Some(self.endpoint.clone())
    }
}
