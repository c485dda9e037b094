use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::codec::{StateKeyCodec, StateValueCodec};
use crate::storage::{OrderedWrites, StorageKey, StorageValue};
use crate::{Prefix, Storage};

type Writes = BTreeMap<StorageKey, Option<StorageValue>>;

/// Accumulates the writes of every committed transaction in a block on top of the
/// underlying storage. Obtained from a [`WorkingSet`] through either
/// [`WorkingSet::checkpoint`] or [`WorkingSet::revert`].
pub struct StateCheckpoint<S: Storage> {
    inner: S,
    writes: Writes,
}

impl<S: Storage> Debug for StateCheckpoint<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCheckpoint")
            .field("pending_writes", &self.writes.len())
            .finish()
    }
}

impl<S: Storage> StateCheckpoint<S> {
    /// Creates an empty checkpoint over `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Default::default(),
        }
    }

    /// Opens a revertable [`WorkingSet`] for the next transaction.
    pub fn to_revertable(self) -> WorkingSet<S> {
        WorkingSet {
            checkpoint: self,
            writes: Default::default(),
        }
    }

    /// Drains the accumulated writes, ordered by key.
    pub fn freeze(&mut self) -> OrderedWrites {
        std::mem::take(&mut self.writes).into_iter().collect()
    }

    /// Flushes every accumulated write into the underlying storage.
    pub fn commit(mut self) -> anyhow::Result<S> {
        let writes = self.freeze();
        self.inner.commit(writes)?;
        Ok(self.inner)
    }

    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        match self.writes.get(key) {
            Some(value) => value.clone(),
            None => self.inner.get(key),
        }
    }
}

/// This structure contains the writes performed by a single transaction.
/// There are two ways to convert it into a [`StateCheckpoint`]:
/// 1. By using the checkpoint() method, where all the changes are added to the underlying StateCheckpoint.
/// 2. By using the revert method, where the most recent changes are discarded and the previous `StateCheckpoint` is returned.
pub struct WorkingSet<S: Storage> {
    checkpoint: StateCheckpoint<S>,
    writes: Writes,
}

impl<S: Storage> Debug for WorkingSet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingSet")
            .field("checkpoint", &self.checkpoint)
            .field("pending_writes", &self.writes.len())
            .finish()
    }
}

impl<S: Storage> WorkingSet<S> {
    /// Creates a working set directly over `inner`.
    pub fn new(inner: S) -> Self {
        StateCheckpoint::new(inner).to_revertable()
    }

    /// Keeps the writes of this working set.
    pub fn checkpoint(self) -> StateCheckpoint<S> {
        let mut checkpoint = self.checkpoint;
        checkpoint.writes.extend(self.writes);
        checkpoint
    }

    /// Discards the writes of this working set.
    pub fn revert(self) -> StateCheckpoint<S> {
        self.checkpoint
    }

    /// Returns a handle to the backing storage.
    pub fn backing(&self) -> &S {
        &self.checkpoint.inner
    }

    pub(crate) fn get(&mut self, key: &StorageKey) -> Option<StorageValue> {
        match self.writes.get(key) {
            Some(value) => value.clone(),
            None => self.checkpoint.get(key),
        }
    }

    pub(crate) fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.writes.insert(key, Some(value));
    }

    pub(crate) fn delete(&mut self, key: StorageKey) {
        self.writes.insert(key, None);
    }
}

impl<S: Storage> WorkingSet<S> {
    pub(crate) fn set_value<K, V, C>(
        &mut self,
        prefix: &Prefix,
        codec: &C,
        storage_key: &K,
        value: &V,
    ) where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, storage_key, codec);
        let storage_value = StorageValue::new(value, codec);
        self.set(storage_key, storage_value);
    }

    pub(crate) fn get_value<K, V, C>(
        &mut self,
        prefix: &Prefix,
        codec: &C,
        storage_key: &K,
    ) -> Option<V>
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, storage_key, codec);
        self.get_decoded(storage_key, codec)
    }

    pub(crate) fn remove_value<K, V, C>(
        &mut self,
        prefix: &Prefix,
        codec: &C,
        storage_key: &K,
    ) -> Option<V>
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, storage_key, codec);
        let storage_value = self.get_decoded(storage_key.clone(), codec)?;
        self.delete(storage_key);
        Some(storage_value)
    }

    pub(crate) fn delete_value<K, C>(&mut self, prefix: &Prefix, codec: &C, storage_key: &K)
    where
        C: StateKeyCodec<K>,
    {
        let storage_key = StorageKey::new(prefix, storage_key, codec);
        self.delete(storage_key);
    }

    fn get_decoded<V, C>(&mut self, storage_key: StorageKey, codec: &C) -> Option<V>
    where
        C: StateValueCodec<V>,
    {
        let storage_value = self.get(&storage_key)?;
        Some(codec.decode_value(storage_value.value()))
    }
}
