use std::any::Any;

use crate::error::ProviderError;

/// Session + per-service client factory. Adapters never construct SDK
/// clients themselves; they ask the provider for one by service name, so
/// a single provider instance can be swapped for a local-testing stand-in.
///
/// Handles are type-erased (`Box<dyn Any>`) because the core has no
/// knowledge of any particular cloud SDK's client types; a concrete
/// adapter downcasts to the type it expects.
pub trait CloudProvider: Send + Sync {
    fn client(&self, service: &str) -> Result<Box<dyn Any>, ProviderError>;
    fn resource(&self, service: &str) -> Result<Box<dyn Any>, ProviderError>;
    fn endpoint(&self, service: &str) -> Option<String>;
}
