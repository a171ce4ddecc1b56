use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ConnectorError;
use crate::source::{Calc, FieldAccess, ResolveCtx, ResourceOutput, ValueSource};

/// A deferred value: a thunk that, at resolve time, extracts a field from a
/// producing Resource's output, optionally composed through further
/// attribute accesses or a CalcConnector. See spec §4.1.
pub struct Connector<T> {
    source: Arc<dyn ValueSource>,
    _marker: PhantomData<fn() -> T>,
}

// Manual Clone: derive(Clone) would require T: Clone, which we don't need —
// the phantom marker carries no data.
impl<T> Clone for Connector<T> {
    fn clone(&self) -> Self {
        Self { source: self.source.clone(), _marker: PhantomData }
    }
}

impl<T: DeserializeOwned> Connector<T> {
    /// A Connector that resolves directly to `producer`'s output (or the
    /// whole output if `T` is the producer's Output type itself).
    pub fn of(producer: Uuid) -> Self {
        Self { source: Arc::new(ResourceOutput::new(producer)), _marker: PhantomData }
    }

    /// Compose a field access on top of this Connector — `vpc.output.
    /// cidr_block` written as `vpc_output.field::<String>("cidr_block")`.
    pub fn field<U: DeserializeOwned>(&self, name: &str) -> Connector<U> {
        Connector {
            source: Arc::new(FieldAccess::new(self.source.clone(), vec![name.to_string()])),
            _marker: PhantomData,
        }
    }

    /// Drive resolution; idempotent within a run (cached by the underlying
    /// `ValueSource`). Fails with `UnresolvedProducer` if any root producer
    /// has not applied yet.
    pub fn resolve(&self, ctx: &dyn ResolveCtx) -> Result<T, ConnectorError> {
        let value = self.source.resolve_value(ctx)?;
        serde_json::from_value(value).map_err(ConnectorError::from)
    }

    /// The set of Resources ultimately feeding this Connector. Singleton
    /// for a plain field-access chain; the union of every argument's roots
    /// for a CalcConnector.
    pub fn root_producers(&self) -> HashSet<Uuid> {
        let mut acc = HashSet::new();
        self.source.root_producers(&mut acc);
        acc
    }

    pub(crate) fn erased(&self) -> Arc<dyn ValueSource> {
        self.source.clone()
    }
}

macro_rules! calc_n {
    ($name:ident, $( $arg:ident : $T:ident ),+) => {
        /// Build a CalcConnector over N typed argument Connectors and a
        /// pure computation. The computation must be total and terminating;
        /// it is re-run at most once per resolve pass (cached).
        pub fn $name<$($T: DeserializeOwned + 'static,)+ R: Serialize + DeserializeOwned>(
            $($arg: Connector<$T>,)+
            compute: impl Fn($($T),+) -> R + Send + Sync + 'static,
        ) -> Connector<R> {
            let args: Vec<Arc<dyn ValueSource>> = vec![$($arg.erased()),+];
            #[allow(non_snake_case)]
            let compute = Box::new(move |values: &[Value]| -> Result<Value, ConnectorError> {
                let mut iter = values.iter().cloned();
                $(
                    let $arg: $T = serde_json::from_value(
                        iter.next().expect("calc_n: argument count mismatch"),
                    )?;
                )+
                let result = compute($($arg),+);
                serde_json::to_value(result).map_err(ConnectorError::from)
            });
            Connector {
                source: Arc::new(Calc::new(args, compute)),
                _marker: PhantomData,
            }
        }
    };
}

calc_n!(calc1, a: A);
calc_n!(calc2, a: A, b: B);
calc_n!(calc3, a: A, b: B, c: C);
calc_n!(calc4, a: A, b: B, c: C, d: D);
