use std::collections::HashSet;
use std::sync::OnceLock;

use serde_json::Value;
use uuid::Uuid;

use crate::error::ConnectorError;

/// Anything that can hand back a Resource's current, fully-concrete output.
///
/// Implemented by the Arena (see `strata-resource`) during an apply run.
/// A Connector never holds a direct reference to its producer — only its
/// `Uuid` — so the dependency graph never forms a reference cycle.
pub trait ResolveCtx {
    fn output_of(&self, producer: Uuid) -> Option<&Value>;
}

/// Type-erased node in a Connector's resolution chain. Every `Connector<T>`
/// is, underneath, an `Arc<dyn ValueSource>` plus a phantom `T`.
pub trait ValueSource: Send + Sync {
    fn root_producers(&self, acc: &mut HashSet<Uuid>);
    fn resolve_value(&self, ctx: &dyn ResolveCtx) -> Result<Value, ConnectorError>;
}

/// Leaf: the Connector resolves directly to a producing Resource's output.
pub struct ResourceOutput {
    pub producer: Uuid,
    cache: OnceLock<Value>,
}

impl ResourceOutput {
    pub fn new(producer: Uuid) -> Self {
        Self { producer, cache: OnceLock::new() }
    }
}

impl ValueSource for ResourceOutput {
    fn root_producers(&self, acc: &mut HashSet<Uuid>) {
        acc.insert(self.producer);
    }

    fn resolve_value(&self, ctx: &dyn ResolveCtx) -> Result<Value, ConnectorError> {
        if let Some(v) = self.cache.get() {
            return Ok(v.clone());
        }
        let output = ctx
            .output_of(self.producer)
            .ok_or(ConnectorError::UnresolvedProducer(self.producer))?
            .clone();
        // cache may already be set by a racing resolve; either value is
        // the same concrete output, so ignore the set() result.
        let _ = self.cache.set(output.clone());
        Ok(output)
    }
}

/// Composes a dotted attribute access on top of any other `ValueSource` —
/// the Rust realization of "accessing an unknown attribute on a Connector
/// returns a new Connector composing the attribute access".
pub struct FieldAccess {
    parent: std::sync::Arc<dyn ValueSource>,
    path: Vec<String>,
    cache: OnceLock<Value>,
}

impl FieldAccess {
    pub fn new(parent: std::sync::Arc<dyn ValueSource>, path: Vec<String>) -> Self {
        Self { parent, path, cache: OnceLock::new() }
    }
}

impl ValueSource for FieldAccess {
    fn root_producers(&self, acc: &mut HashSet<Uuid>) {
        self.parent.root_producers(acc);
    }

    fn resolve_value(&self, ctx: &dyn ResolveCtx) -> Result<Value, ConnectorError> {
        if let Some(v) = self.cache.get() {
            return Ok(v.clone());
        }
        let mut v = self.parent.resolve_value(ctx)?;
        for segment in &self.path {
            v = v
                .get(segment)
                .cloned()
                .ok_or_else(|| ConnectorError::MissingField(segment.clone()))?;
        }
        let _ = self.cache.set(v.clone());
        Ok(v)
    }
}

/// A CalcConnector: eagerly resolves every argument `ValueSource`, then
/// invokes a pure, user-supplied computation over the resolved values.
pub struct Calc {
    args: Vec<std::sync::Arc<dyn ValueSource>>,
    #[allow(clippy::type_complexity)]
    compute: Box<dyn Fn(&[Value]) -> Result<Value, ConnectorError> + Send + Sync>,
    cache: OnceLock<Value>,
}

impl Calc {
    pub fn new(
        args: Vec<std::sync::Arc<dyn ValueSource>>,
        compute: Box<dyn Fn(&[Value]) -> Result<Value, ConnectorError> + Send + Sync>,
    ) -> Self {
        Self { args, compute, cache: OnceLock::new() }
    }
}

impl ValueSource for Calc {
    fn root_producers(&self, acc: &mut HashSet<Uuid>) {
        for arg in &self.args {
            arg.root_producers(acc);
        }
    }

    fn resolve_value(&self, ctx: &dyn ResolveCtx) -> Result<Value, ConnectorError> {
        if let Some(v) = self.cache.get() {
            return Ok(v.clone());
        }
        let mut resolved = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            resolved.push(arg.resolve_value(ctx)?);
        }
        let result = (self.compute)(&resolved)?;
        let _ = self.cache.set(result.clone());
        Ok(result)
    }
}
