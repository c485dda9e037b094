use std::fmt::Display;
use std::sync::Arc;

use crate::codec::{StateKeyCodec, StateValueCodec};
use crate::Prefix;

/// `Key` type for the [`Storage`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StorageKey {
    key: Arc<Vec<u8>>,
}

impl StorageKey {
    /// Returns the full key, prefix included.
    pub fn key(&self) -> Arc<Vec<u8>> {
        self.key.clone()
    }

    /// Creates a new StorageKey that combines a prefix and a key.
    pub fn new<K, KC>(prefix: &Prefix, key: &K, codec: &KC) -> Self
    where
        KC: StateKeyCodec<K>,
    {
        let encoded_key = codec.encode_key(key);

        let mut full_key = Vec::<u8>::with_capacity(prefix.len() + encoded_key.len());
        full_key.extend_from_slice(prefix.as_bytes());
        full_key.extend_from_slice(&encoded_key);

        Self {
            key: Arc::new(full_key),
        }
    }
}

impl AsRef<Vec<u8>> for StorageKey {
    fn as_ref(&self) -> &Vec<u8> {
        &self.key
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.key.as_ref()))
    }
}

/// A serialized value suitable for storing. Internally uses an [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StorageValue {
    value: Arc<Vec<u8>>,
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl StorageValue {
    /// Create a new storage value by serializing the input with the given codec.
    pub fn new<V, VC>(value: &V, codec: &VC) -> Self
    where
        VC: StateValueCodec<V>,
    {
        Self {
            value: Arc::new(codec.encode_value(value)),
        }
    }

    /// Get the bytes of this value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// Writes collected by a [`crate::StateCheckpoint`], ordered by key.
/// `None` marks a deletion.
pub type OrderedWrites = Vec<(StorageKey, Option<StorageValue>)>;

/// An interface for storing and retrieving values in the storage.
///
/// Implementations are handles: cloning one must yield a view over the same
/// underlying data.
pub trait Storage: Clone {
    /// Returns the value corresponding to the key or None if key is absent.
    fn get(&self, key: &StorageKey) -> Option<StorageValue>;

    /// Atomically applies all the writes. Either every write becomes visible or none does.
    fn commit(&self, writes: OrderedWrites) -> anyhow::Result<()>;

    /// Indicates if storage is empty or not.
    /// Useful during initialization
    fn is_empty(&self) -> bool;
}

// Used only in tests.
#[cfg(test)]
impl From<&'static str> for StorageKey {
    fn from(key: &'static str) -> Self {
        Self {
            key: Arc::new(key.as_bytes().to_vec()),
        }
    }
}

// Used only in tests.
#[cfg(test)]
impl From<&'static str> for StorageValue {
    fn from(value: &'static str) -> Self {
        Self {
            value: Arc::new(value.as_bytes().to_vec()),
        }
    }
}
