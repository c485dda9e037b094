//! Serialization and deserialization -related logic.

/// A trait for types that can serialize and deserialize keys for storage
/// access.
pub trait StateKeyCodec<K> {
    /// Error type that can arise during deserialization.
    type KeyError: std::fmt::Debug;

    /// Serializes a key into a bytes vector.
    ///
    /// This method **must** not panic as all instances of the key type are
    /// supposed to be serializable.
    fn encode_key(&self, key: &K) -> Vec<u8>;

    /// Tries to deserialize a key from a bytes slice, and returns a
    /// [`Result`] with either the deserialized key or an error.
    fn try_decode_key(&self, bytes: &[u8]) -> Result<K, Self::KeyError>;
}

/// A trait for types that can serialize and deserialize values for storage
/// access.
pub trait StateValueCodec<V> {
    /// Error type that can arise during deserialization.
    type ValueError: std::fmt::Debug;

    /// Serializes a value into a bytes vector.
    ///
    /// This method **must** not panic as all instances of the value type are
    /// supposed to be serializable.
    fn encode_value(&self, value: &V) -> Vec<u8>;

    /// Tries to deserialize a value from a bytes slice, and returns a
    /// [`Result`] with either the deserialized value or an error.
    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError>;

    /// Deserializes a value from a bytes slice.
    ///
    /// # Panics
    /// Panics if the call to [`StateValueCodec::try_decode_value`] fails. Values
    /// are only ever written through the same codec, so a failure here means the
    /// store is corrupted.
    fn decode_value(&self, bytes: &[u8]) -> V {
        self.try_decode_value(bytes).unwrap_or_else(|err| {
            panic!(
                "Failed to decode value 0x{}, error: {:?}",
                hex::encode(bytes),
                err
            )
        })
    }
}

/// A marker trait for types that implement both [`StateKeyCodec`] and
/// [`StateValueCodec`].
pub trait StateCodec<K, V>: StateKeyCodec<K> + StateValueCodec<V> {}

impl<K, V, C> StateCodec<K, V> for C where C: StateKeyCodec<K> + StateValueCodec<V> {}

/// A [`StateCodec`] that uses [`borsh`] for all keys and values.
#[derive(Debug, Default, PartialEq, Eq, Clone, borsh::BorshDeserialize, borsh::BorshSerialize)]
pub struct BorshCodec;

impl<K> StateKeyCodec<K> for BorshCodec
where
    K: borsh::BorshSerialize + borsh::BorshDeserialize,
{
    type KeyError = std::io::Error;

    fn encode_key(&self, key: &K) -> Vec<u8> {
        let mut buf = Vec::new();
        key.serialize(&mut buf)
            .unwrap_or_else(|e| panic!("Failed to serialize key: {e}"));
        buf
    }

    fn try_decode_key(&self, bytes: &[u8]) -> Result<K, Self::KeyError> {
        K::try_from_slice(bytes)
    }
}

impl<V> StateValueCodec<V> for BorshCodec
where
    V: borsh::BorshSerialize + borsh::BorshDeserialize,
{
    type ValueError = std::io::Error;

    fn encode_value(&self, value: &V) -> Vec<u8> {
        let mut buf = Vec::new();
        value
            .serialize(&mut buf)
            .unwrap_or_else(|e| panic!("Failed to serialize value: {e}"));
        buf
    }

    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::ValueError> {
        V::try_from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borsh_codec_keys_are_stable() {
        let codec = BorshCodec;
        let encoded = <BorshCodec as StateKeyCodec<(u64, u64)>>::encode_key(&codec, &(1, 2));
        assert_eq!(encoded, vec![1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0]);
        let decoded: (u64, u64) = codec.try_decode_key(&encoded).unwrap();
        assert_eq!(decoded, (1, 2));
    }

    #[test]
    #[should_panic(expected = "Failed to decode value")]
    fn corrupted_value_panics() {
        let codec = BorshCodec;
        let _: u64 = codec.decode_value(&[1, 2, 3]);
    }
}
