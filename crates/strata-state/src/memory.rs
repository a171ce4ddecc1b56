use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::envelope::StateEnvelope;
use crate::error::StoreError;
use crate::store::StateStore;

#[derive(Default)]
struct Inner {
    envelopes: HashMap<Uuid, StateEnvelope>,
    pending_destroy: Vec<StateEnvelope>,
}

/// Reference StateStore for tests and single-process demos. Not durable
/// across restarts; state lives only as long as the process.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, uuid: Uuid, from_pending: bool) -> Result<Option<StateEnvelope>, StoreError> {
        let inner = self.inner.lock().expect("state store mutex poisoned");
        if from_pending {
            Ok(inner.pending_destroy.iter().find(|e| e.uuid == uuid).cloned())
        } else {
            Ok(inner.envelopes.get(&uuid).cloned())
        }
    }

    fn put(&self, uuid: Uuid, envelope: StateEnvelope) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("state store mutex poisoned");
        inner.envelopes.insert(uuid, envelope);
        Ok(())
    }

    fn delete(&self, uuid: Uuid, from_pending: bool) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("state store mutex poisoned");
        if from_pending {
            inner.pending_destroy.retain(|e| e.uuid != uuid);
        } else {
            inner.envelopes.remove(&uuid);
        }
        Ok(())
    }

    fn mark_destroy(&self, envelope: StateEnvelope) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("state store mutex poisoned");
        inner.pending_destroy.push(envelope);
        Ok(())
    }

    fn list_pending_destroy(&self) -> Result<Vec<StateEnvelope>, StoreError> {
        let inner = self.inner.lock().expect("state store mutex poisoned");
        Ok(inner.pending_destroy.clone())
    }
}
