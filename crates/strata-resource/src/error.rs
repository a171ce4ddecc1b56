use uuid::Uuid;

/// Errors an adapter's create/update/destroy/is_drifted hooks may return.
/// See spec §7 — `NotFound` and `DryRunOperation` are handled specially by
/// the engine; the rest propagate unchanged.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The remote object is gone. Treated as success by `destroy`, as
    /// drift by `is_drifted`, as create-required by `apply`.
    #[error("remote object not found")]
    NotFound,

    /// Raised only while the dry-run flag is set; swallowed by the engine,
    /// which expects the adapter to have already fabricated sentinel
    /// outputs before returning this.
    #[error("operation skipped under dry-run")]
    DryRunOperation,

    /// Provider-side failure that may succeed on retry.
    #[error("transient provider error: {0}")]
    Transient(String),

    /// From the bounded-poll utility.
    #[error("operation timed out")]
    Timeout,
}

/// Engine-level invariant violations. Fatal: the engine aborts the apply
/// and leaves state consistent up to the last successful envelope write.
///
/// Not every invariant spec §7 names lives here: a Connector resolving
/// before its producer applied is `strata_connector::ConnectorError::
/// UnresolvedProducer` (that crate sits below `strata-resource` in the
/// dependency graph and can't be made to construct this type without a
/// cycle), so that one keeps its own home instead of being duplicated.
#[derive(Debug, thiserror::Error)]
pub enum InvariantViolation {
    #[error("duplicate uuid {0} assigned to more than one resource")]
    DuplicateUuid(Uuid),

    #[error("pending-destroy entry references unknown class tag '{0}'")]
    UnknownClassTag(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Connector(#[from] strata_connector::ConnectorError),

    #[error(transparent)]
    Store(#[from] strata_state::StoreError),

    #[error("envelope (de)serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}
