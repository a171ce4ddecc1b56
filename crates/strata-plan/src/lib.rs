//! Plan: a composite Resource that owns a tree of child Resources, derives
//! their identities, and coordinates dependency-first apply/destroy.

mod adapter;
mod error;
mod plan;
mod traversal;

pub use adapter::PlanAdapter;
pub use error::PlanError;
pub use plan::Plan;
pub use traversal::{apply_node, destroy_node};
