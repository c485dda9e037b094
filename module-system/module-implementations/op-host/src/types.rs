use std::fmt;
use std::io;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use ethereum_types::U256;
use op_modules_api::Address;
use serde::{Deserialize, Serialize};

/// Numeric identifier of a bridge, allocated sequentially from 1.
pub type BridgeId = u64;
/// Position of an output in the per-bridge output sequence, starting at 1.
pub type OutputIndex = u64;
/// Per-bridge deposit (`l1_sequence`) or withdrawal (`l2_sequence`) number.
pub type Sequence = u64;

/// A 32-byte digest: output roots, withdrawal leaves and proof siblings.
#[derive(
    BorshDeserialize,
    BorshSerialize,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct Digest(#[serde(with = "hex")] pub [u8; 32]);

impl Digest {
    /// The all-zero digest, never accepted as an output root.
    pub const ZERO: Digest = Digest([0; 32]);

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// An amount of a host denom, in minor units.
///
/// Stored as 32 little-endian bytes, rendered as a decimal string in human
/// readable formats.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Amount = Amount(U256([0; 4]));

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Little-endian 256-bit encoding, used in storage and in withdrawal leaves.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.0.to_little_endian(&mut bytes);
        bytes
    }

    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(U256::from_little_endian(&bytes))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl FromStr for Amount {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s)
            .map(Amount)
            .map_err(|e| anyhow::anyhow!("invalid amount {:?}: {:?}", s, e))
    }
}

impl BorshSerialize for Amount {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }
}

impl BorshDeserialize for Amount {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Self::from_le_bytes(bytes))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            Serialize::serialize(&self.to_le_bytes(), serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = <String as Deserialize>::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <[u8; 32] as Deserialize>::deserialize(deserializer)?;
            Ok(Self::from_le_bytes(bytes))
        }
    }
}

/// Where the child chain publishes its block data.
#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum ChainType {
    /// Batches are posted as transactions on the host chain itself.
    Host,
    /// Batches are posted as Celestia blobs.
    Celestia,
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainType::Host => write!(f, "host"),
            ChainType::Celestia => write!(f, "celestia"),
        }
    }
}

/// Pointer to the batch submission medium and the account allowed to submit.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    pub chain_type: ChainType,
    pub submitter: Address,
}

/// Per-bridge policy, owned by the bridge registry.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub proposer: Address,
    pub challenger: Address,
    /// Child-chain blocks the proposer is expected to cover per output.
    pub submission_interval: u64,
    /// Challenge window, in seconds.
    pub finalization_period: u64,
    pub batch_info: BatchInfo,
    #[serde(default)]
    pub oracle_enabled: bool,
    #[serde(default, with = "hex")]
    pub metadata: Vec<u8>,
}

/// Inclusive range of child-chain block numbers.
#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Lifecycle of an output. `Finalized` and `Deleted` are terminal.
#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputStatus {
    Pending,
    Finalized,
    Deleted,
}

/// A child-chain state commitment proposed on the host chain.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub output_root: Digest,
    pub block_range: BlockRange,
    pub proposed_at: u64,
    pub finalization_deadline: u64,
    /// Whether oracle data accompanied the output, as configured when it was proposed.
    pub oracle_enabled: bool,
    pub status: OutputStatus,
}

impl Output {
    /// The challenge window is over once the block time passes the deadline.
    pub fn is_due(&self, now: u64) -> bool {
        now > self.finalization_deadline
    }
}

/// A host-to-child transfer, kept forever as an audit trail.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositRecord {
    pub sender: Address,
    pub receiver: Address,
    pub amount: Amount,
    pub l1_denom: String,
    pub l2_denom: String,
    pub hook: Option<Vec<u8>>,
    pub block_height: u64,
}
