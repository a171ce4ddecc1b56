//! The Resource lifecycle contract: the adapter trait concrete resources
//! implement, stable identity derivation, the arena of resource nodes, and
//! the default apply/destroy algorithm shared by leaf Resources and Plans.

mod adapter;
mod apply;
mod error;
mod identity;
mod node;
mod resource;
mod tags;

pub use adapter::ResourceAdapter;
pub use apply::{apply_resource, destroy_resource, ApplyOutcome};
pub use error::{AdapterError, InvariantViolation, ResourceError};
pub use identity::{join_path, sub_uuid};
pub use node::{Arena, ResourceNode, RunContext};
pub use resource::Resource;
pub use tags::SystemTags;
