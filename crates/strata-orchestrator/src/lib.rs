//! The apply/destroy driver: per-run identifiers, root traversal entry
//! points, and pending-destroy drain.

mod error;
mod orchestrator;
mod registry;

pub use error::OrchestratorError;
pub use orchestrator::{apply_root, destroy_root};
pub use registry::PendingDestroyRegistry;
