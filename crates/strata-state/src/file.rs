use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use fs2::FileExt;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::envelope::StateEnvelope;
use crate::error::StoreError;
use crate::store::StateStore;

const TO_DESTROY_KEY: &str = "to_destroy";

/// Reference StateStore backend: a single JSON document on disk, matching
/// the wire format `{"<uuid>": {envelope...}, ..., "to_destroy": [...]}`.
/// Rewrites the whole document on every mutating call, guarded by an
/// advisory exclusive file lock so two processes never interleave writes.
///
/// Mirrors `FileResourceManager`: load-whole-document, mutate in memory,
/// write-whole-document, on every call.
pub struct FileStateStore {
    path: PathBuf,
    // Guards against concurrent writers within this process; fs2's lock
    // only arbitrates across processes.
    guard: Mutex<()>,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), guard: Mutex::new(()) }
    }

    fn load(&self) -> Result<(File, Map<String, Value>), StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;
        file.lock_exclusive().map_err(|_| StoreError::LockConflict)?;

        let mut contents = String::new();
        let mut reader = &file;
        reader.read_to_string(&mut contents)?;

        let doc: Map<String, Value> = if contents.trim().is_empty() {
            Map::new()
        } else {
            serde_json::from_str(&contents)?
        };
        Ok((file, doc))
    }

    fn save(&self, mut file: File, doc: &Map<String, Value>) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(doc)?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(serialized.as_bytes())?;
        file.sync_all()?;
        file.unlock().ok();
        Ok(())
    }

    fn to_destroy_list(doc: &Map<String, Value>) -> Result<Vec<StateEnvelope>, StoreError> {
        match doc.get(TO_DESTROY_KEY) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn put_to_destroy_list(doc: &mut Map<String, Value>, entries: Vec<StateEnvelope>) -> Result<(), StoreError> {
        doc.insert(TO_DESTROY_KEY.to_string(), serde_json::to_value(entries)?);
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, uuid: Uuid, from_pending: bool) -> Result<Option<StateEnvelope>, StoreError> {
        let _guard = self.guard.lock().expect("state file mutex poisoned");
        let (_file, doc) = self.load()?;
        if from_pending {
            let pending = Self::to_destroy_list(&doc)?;
            Ok(pending.into_iter().find(|e| e.uuid == uuid))
        } else {
            match doc.get(&uuid.to_string()) {
                Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
                None => Ok(None),
            }
        }
    }

    fn put(&self, uuid: Uuid, envelope: StateEnvelope) -> Result<(), StoreError> {
        let _guard = self.guard.lock().expect("state file mutex poisoned");
        let (file, mut doc) = self.load()?;
        doc.insert(uuid.to_string(), serde_json::to_value(&envelope)?);
        self.save(file, &doc)
    }

    fn delete(&self, uuid: Uuid, from_pending: bool) -> Result<(), StoreError> {
        let _guard = self.guard.lock().expect("state file mutex poisoned");
        let (file, mut doc) = self.load()?;
        if from_pending {
            let mut pending = Self::to_destroy_list(&doc)?;
            pending.retain(|e| e.uuid != uuid);
            Self::put_to_destroy_list(&mut doc, pending)?;
        } else {
            doc.remove(&uuid.to_string());
        }
        self.save(file, &doc)
    }

    fn mark_destroy(&self, envelope: StateEnvelope) -> Result<(), StoreError> {
        let _guard = self.guard.lock().expect("state file mutex poisoned");
        let (file, mut doc) = self.load()?;
        let mut pending = Self::to_destroy_list(&doc)?;
        pending.push(envelope);
        Self::put_to_destroy_list(&mut doc, pending)?;
        self.save(file, &doc)
    }

    fn list_pending_destroy(&self) -> Result<Vec<StateEnvelope>, StoreError> {
        let _guard = self.guard.lock().expect("state file mutex poisoned");
        let (_file, doc) = self.load()?;
        Self::to_destroy_list(&doc)
    }
}
