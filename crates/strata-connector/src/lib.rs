//! Deferred value binding between Resources.
//!
//! A `Connector<T>` is a thunk over another Resource's eventual output; a
//! `Bound<T>` is an Input struct field that starts life as either a
//! concrete value or a Connector and must be concrete by apply time.

mod bound;
mod connector;
mod error;
mod source;

pub use bound::Bound;
pub use connector::{calc1, calc2, calc3, calc4, Connector};
pub use error::ConnectorError;
pub use source::ResolveCtx;
