//! A keyed state container.

use core::marker::PhantomData;

use thiserror::Error;

use crate::codec::{BorshCodec, StateCodec};
use crate::storage::StorageKey;
use crate::{Prefix, Storage, WorkingSet};

/// A container that maps keys to values.
///
/// # Type parameters
/// [`StateMap`] is generic over:
/// - a key type (`K`);
/// - a value type (`V`);
/// - a [`StateCodec`] (`C`).
#[derive(borsh::BorshDeserialize, borsh::BorshSerialize, Debug, PartialEq, Clone)]
pub struct StateMap<K, V, C = BorshCodec>
where
    C: StateCodec<K, V>,
{
    _phantom: (PhantomData<K>, PhantomData<V>),
    codec: C,
    prefix: Prefix,
}

/// Error type for `StateMap` get method.
#[derive(Debug, Error)]
pub enum Error {
    /// No value is stored under the key.
    #[error("Value not found for prefix: {0} and: storage key {1}")]
    MissingValue(Prefix, StorageKey),
}

impl<K, V> StateMap<K, V>
where
    BorshCodec: StateCodec<K, V>,
{
    /// Creates a new [`StateMap`] with the given prefix and the default
    /// [`StateCodec`] (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            codec: BorshCodec,
            prefix,
        }
    }
}

impl<K, V, C> StateMap<K, V, C>
where
    C: StateCodec<K, V>,
{
    /// Creates a new [`StateMap`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateMap`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Inserts a key-value pair into the map.
    pub fn set<S: Storage>(&self, key: &K, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), &self.codec, key, value)
    }

    /// Returns the value corresponding to the key or None if key is absent in the StateMap.
    pub fn get<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), &self.codec, key)
    }

    /// Returns the value corresponding to the key or Error if key is absent in the StateMap.
    pub fn get_or_err<S: Storage>(
        &self,
        key: &K,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, Error> {
        self.get(key, working_set).ok_or_else(|| {
            Error::MissingValue(
                self.prefix().clone(),
                StorageKey::new(self.prefix(), key, &self.codec),
            )
        })
    }

    /// Returns `true` if a value is stored under the key.
    pub fn contains<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> bool {
        self.get(key, working_set).is_some()
    }

    /// Removes a key from the StateMap, returning the corresponding value (or None if the key is absent).
    pub fn remove<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.remove_value(self.prefix(), &self.codec, key)
    }

    /// Deletes a key from the StateMap.
    pub fn delete<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) {
        working_set.delete_value(self.prefix(), &self.codec, key);
    }
}
