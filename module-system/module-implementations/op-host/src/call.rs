use op_modules_api::Address;
use serde::{Deserialize, Serialize};

use crate::merkle::ProofStep;
use crate::types::{Amount, BatchInfo, BlockRange, BridgeConfig, BridgeId, Digest, OutputIndex, Sequence};

/// This enumeration represents the available call messages for interacting with
/// the `op-host` module. The signer of the transaction is the acting address.
#[derive(borsh::BorshDeserialize, borsh::BorshSerialize, Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "snake_case")]
pub enum CallMessage {
    /// Register a new bridge; the signer becomes its creator.
    RegisterBridge {
        config: BridgeConfig,
        /// Host denoms bridgeable from day one.
        l1_denoms: Vec<String>,
    },
    /// Hand the proposer role to another address.
    UpdateProposer {
        bridge_id: BridgeId,
        new_proposer: Address,
    },
    /// Hand the challenger role to another address.
    UpdateChallenger {
        bridge_id: BridgeId,
        new_challenger: Address,
    },
    /// Point the bridge at a new batch submission medium or submitter.
    UpdateBatchInfo {
        bridge_id: BridgeId,
        batch_info: BatchInfo,
    },
    /// Replace the bridge metadata.
    UpdateMetadata {
        bridge_id: BridgeId,
        metadata: Vec<u8>,
    },
    /// Toggle oracle data on future outputs.
    SetOracleEnabled { bridge_id: BridgeId, enabled: bool },
    /// Make a host denom bridgeable.
    RegisterTokenPair { bridge_id: BridgeId, l1_denom: String },
    /// Announce a published batch of child-chain block data.
    RecordBatch { bridge_id: BridgeId, batch: Vec<u8> },
    /// Commit a child-chain state root.
    ProposeOutput {
        bridge_id: BridgeId,
        output_root: Digest,
        block_range: BlockRange,
    },
    /// Invalidate a pending output and every pending output after it.
    DeleteOutput {
        bridge_id: BridgeId,
        output_index: OutputIndex,
    },
    /// Lock host funds for the child chain.
    InitiateDeposit {
        bridge_id: BridgeId,
        receiver: Address,
        amount: Amount,
        denom: String,
        hook: Option<Vec<u8>>,
    },
    /// Release host funds against a finalized output.
    FinalizeWithdrawal(WithdrawalClaim),
}

/// A child-chain withdrawal, proven against a finalized output.
#[derive(borsh::BorshDeserialize, borsh::BorshSerialize, Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct WithdrawalClaim {
    pub bridge_id: BridgeId,
    pub output_index: OutputIndex,
    pub l2_sequence: Sequence,
    pub sender: Address,
    pub receiver: Address,
    pub amount: Amount,
    pub denom: String,
    /// Sibling path from the withdrawal leaf up to the output root.
    pub proof: Vec<ProofStep>,
}
