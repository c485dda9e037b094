use std::fmt;
use std::str::FromStr;

use bech32::{FromBase32, ToBase32};
use borsh::{BorshDeserialize, BorshSerialize};
use derive_more::{Display, Into};

use crate::error::Bech32ParseError;

const HRP: &str = "init";

/// Human readable form of an [`Address`].
#[derive(
    serde::Serialize,
    serde::Deserialize,
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    Debug,
    PartialEq,
    Clone,
    Eq,
    Into,
    Display,
)]
#[serde(try_from = "String", into = "String")]
#[display(fmt = "{}", "value")]
pub struct AddressBech32 {
    value: String,
}

/// A 32-byte account address on the host chain.
#[derive(PartialEq, Clone, Copy, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct Address {
    addr: [u8; 32],
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.addr
    }
}

impl Address {
    /// Creates a new address containing the given bytes
    pub const fn new(addr: [u8; 32]) -> Self {
        Self { addr }
    }

    /// Returns the raw bytes of the address.
    pub const fn to_bytes(&self) -> [u8; 32] {
        self.addr
    }
}

impl<'a> TryFrom<&'a [u8]> for Address {
    type Error = anyhow::Error;

    fn try_from(addr: &'a [u8]) -> Result<Self, Self::Error> {
        if addr.len() != 32 {
            anyhow::bail!("Address must be 32 bytes long");
        }
        let mut addr_bytes = [0u8; 32];
        addr_bytes.copy_from_slice(addr);
        Ok(Self { addr: addr_bytes })
    }
}

impl FromStr for Address {
    type Err = Bech32ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressBech32::from_str(s)?.to_address()
    }
}

impl From<[u8; 32]> for Address {
    fn from(addr: [u8; 32]) -> Self {
        Self { addr }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match vec_to_bech32m(&self.addr, HRP) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "0x{}", hex::encode(self.addr)),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serde::Serialize::serialize(&self.to_string(), serializer)
        } else {
            serde::Serialize::serialize(&self.addr, serializer)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let address_bech32: AddressBech32 = serde::Deserialize::deserialize(deserializer)?;
            address_bech32
                .to_address()
                .map_err(serde::de::Error::custom)
        } else {
            let addr = <[u8; 32] as serde::Deserialize>::deserialize(deserializer)?;
            Ok(Address { addr })
        }
    }
}

fn vec_to_bech32m(vec: &[u8], hrp: &str) -> Result<String, bech32::Error> {
    let data = vec.to_base32();
    bech32::encode(hrp, data, bech32::Variant::Bech32m)
}

fn bech32m_to_decoded_vec(bech32_addr: &str) -> Result<(String, Vec<u8>), bech32::Error> {
    let (hrp, data, _) = bech32::decode(bech32_addr)?;
    let vec = Vec::<u8>::from_base32(&data)?;
    Ok((hrp, vec))
}

impl AddressBech32 {
    fn to_address(&self) -> Result<Address, Bech32ParseError> {
        let (_, data) = bech32m_to_decoded_vec(&self.value)?;
        let addr: [u8; 32] = data
            .try_into()
            .map_err(|data: Vec<u8>| Bech32ParseError::WrongLength(data.len()))?;
        Ok(Address { addr })
    }
}

impl TryFrom<String> for AddressBech32 {
    type Error = Bech32ParseError;

    fn try_from(addr: String) -> Result<Self, Bech32ParseError> {
        AddressBech32::from_str(&addr)
    }
}

impl FromStr for AddressBech32 {
    type Err = Bech32ParseError;

    fn from_str(s: &str) -> Result<Self, Bech32ParseError> {
        let (hrp, data) = bech32m_to_decoded_vec(s)?;

        if HRP != hrp {
            return Err(Bech32ParseError::WrongHRP(hrp));
        }
        if data.len() != 32 {
            return Err(Bech32ParseError::WrongLength(data.len()));
        }

        Ok(AddressBech32 {
            value: s.to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_address_serialization() {
        let address = Address::from([11; 32]);
        let data: String = serde_json::to_string(&address).unwrap();
        let deserialized_address = serde_json::from_str::<Address>(&data).unwrap();

        assert_eq!(address, deserialized_address);
        assert!(deserialized_address.to_string().starts_with("init1"));
        assert_eq!(
            Address::from_str(&address.to_string()).unwrap(),
            address
        );
    }

    #[test]
    fn test_wrong_hrp_is_rejected() {
        let foreign = vec_to_bech32m(&[3; 32], "cosmos").unwrap();
        assert!(matches!(
            Address::from_str(&foreign),
            Err(Bech32ParseError::WrongHRP(hrp)) if hrp == "cosmos"
        ));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let short = vec_to_bech32m(&[3; 20], HRP).unwrap();
        assert!(matches!(
            Address::from_str(&short),
            Err(Bech32ParseError::WrongLength(20))
        ));
    }
}
