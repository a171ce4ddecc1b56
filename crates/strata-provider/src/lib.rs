//! The CloudProvider abstraction the core consumes, plus a reference
//! local-testing implementation and a bounded-poll waiting helper.

mod error;
mod local;
mod provider;
mod wait;

pub use error::ProviderError;
pub use local::{LocalHandle, LocalProvider};
pub use provider::CloudProvider;
pub use wait::wait_with_timeout;
