use std::collections::HashSet;
use std::fmt;

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::connector::Connector;
use crate::error::ConnectorError;
use crate::source::ResolveCtx;

/// A struct field that may start life as a Connector and must be concrete
/// by the time its owning Resource calls create/update. Input structs use
/// `Bound<T>` for any field that can be wired to another Resource's output;
/// adapters read it post-resolve with `.get()`.
pub enum Bound<T> {
    Concrete(T),
    Deferred(Connector<T>),
}

impl<T> Bound<T> {
    pub fn concrete(value: T) -> Self {
        Bound::Concrete(value)
    }

    pub fn deferred(connector: Connector<T>) -> Self {
        Bound::Deferred(connector)
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Bound::Concrete(_))
    }

    /// Panics if still Deferred — only safe to call after `resolve`.
    pub fn get(&self) -> &T {
        match self {
            Bound::Concrete(v) => v,
            Bound::Deferred(_) => panic!("Bound::get called before resolve"),
        }
    }

    pub fn into_concrete(self) -> Option<T> {
        match self {
            Bound::Concrete(v) => Some(v),
            Bound::Deferred(_) => None,
        }
    }
}

impl<T: DeserializeOwned> Bound<T> {
    /// Idempotent: a Concrete field is left untouched, a Deferred field is
    /// resolved and replaced in place. Adapters call this once per field
    /// before reading input via `.get()` — see `strata-resource::apply`.
    pub fn resolve(&mut self, ctx: &dyn ResolveCtx) -> Result<(), ConnectorError> {
        if let Bound::Deferred(connector) = self {
            let value = connector.resolve(ctx)?;
            *self = Bound::Concrete(value);
        }
        Ok(())
    }

    pub fn root_producers(&self) -> HashSet<Uuid> {
        match self {
            Bound::Concrete(_) => HashSet::new(),
            Bound::Deferred(connector) => connector.root_producers(),
        }
    }
}

impl<T: Clone> Clone for Bound<T> {
    fn clone(&self) -> Self {
        match self {
            Bound::Concrete(v) => Bound::Concrete(v.clone()),
            Bound::Deferred(c) => Bound::Deferred(c.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Concrete(v) => f.debug_tuple("Concrete").field(v).finish(),
            Bound::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl<T> From<T> for Bound<T> {
    fn from(value: T) -> Self {
        Bound::Concrete(value)
    }
}

// A Deferred field is never written to the state envelope mid-apply — by
// the time a Resource persists, every field it owns has been resolved. A
// caller that serializes a still-Deferred Bound has a bug upstream, not a
// representable state, so this errors rather than silently dropping data.
impl<T: Serialize> Serialize for Bound<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bound::Concrete(v) => v.serialize(serializer),
            Bound::Deferred(_) => Err(serde::ser::Error::custom(
                "cannot serialize an unresolved Bound value",
            )),
        }
    }
}

// Deserialized state is always concrete: a persisted envelope only ever
// holds resolved values, never a live Connector.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Bound<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Bound::Concrete)
    }
}
