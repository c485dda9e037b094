use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::storage::{OrderedWrites, Storage, StorageKey, StorageValue};

/// An ordered in-memory [`Storage`]. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStorage {
    db: Arc<RwLock<BTreeMap<StorageKey, StorageValue>>>,
}

impl InMemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.db.read().map(|db| db.len()).unwrap_or_default()
    }
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        let db = self
            .db
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        db.get(key).cloned()
    }

    fn commit(&self, writes: OrderedWrites) -> anyhow::Result<()> {
        let mut db = self
            .db
            .write()
            .map_err(|_| anyhow::anyhow!("storage lock poisoned"))?;
        let count = writes.len();
        for (key, value) in writes {
            match value {
                Some(value) => {
                    db.insert(key, value);
                }
                None => {
                    db.remove(&key);
                }
            }
        }
        debug!(writes = count, "Committed writes to in-memory storage");
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
