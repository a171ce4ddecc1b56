use uuid::Uuid;

use crate::envelope::StateEnvelope;
use crate::error::StoreError;

/// Persists per-resource envelopes and the pending-destroy FIFO. The engine
/// is the only caller; adapters never touch a StateStore directly.
///
/// Every mutating call must be individually durable before returning — the
/// reference `FileStateStore` rewrites its single JSON document per call.
pub trait StateStore: Send + Sync {
    /// `from_pending = true` routes the read against the pending-destroy
    /// collection, keyed by the envelope's own `uuid` field rather than by
    /// map key.
    fn get(&self, uuid: Uuid, from_pending: bool) -> Result<Option<StateEnvelope>, StoreError>;

    fn put(&self, uuid: Uuid, envelope: StateEnvelope) -> Result<(), StoreError>;

    fn delete(&self, uuid: Uuid, from_pending: bool) -> Result<(), StoreError>;

    /// Append to the pending-destroy FIFO (oldest-first on disk; callers
    /// drain via `list_pending_destroy().into_iter().rev()`).
    fn mark_destroy(&self, envelope: StateEnvelope) -> Result<(), StoreError>;

    /// Snapshot of the pending-destroy FIFO in insertion order.
    fn list_pending_destroy(&self) -> Result<Vec<StateEnvelope>, StoreError>;
}
