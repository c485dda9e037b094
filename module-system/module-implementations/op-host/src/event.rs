use op_modules_api::Address;
use serde::{Deserialize, Serialize};

use crate::types::{Amount, BatchInfo, BlockRange, BridgeId, Digest, OutputIndex, Sequence};

/// Structured change record returned by every state transition, consumed by
/// indexers and the child-chain executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CreateBridge {
        bridge_id: BridgeId,
        creator: Address,
        proposer: Address,
        challenger: Address,
        batch_info: BatchInfo,
    },
    UpdateProposer {
        bridge_id: BridgeId,
        proposer: Address,
    },
    UpdateChallenger {
        bridge_id: BridgeId,
        challenger: Address,
    },
    UpdateBatchInfo {
        bridge_id: BridgeId,
        batch_info: BatchInfo,
    },
    UpdateMetadata {
        bridge_id: BridgeId,
        #[serde(with = "hex")]
        metadata: Vec<u8>,
    },
    UpdateOracle {
        bridge_id: BridgeId,
        oracle_enabled: bool,
    },
    RegisterTokenPair {
        bridge_id: BridgeId,
        l1_denom: String,
        l2_denom: String,
    },
    RecordBatch {
        bridge_id: BridgeId,
        submitter: Address,
        batch_hash: Digest,
        batch_len: u64,
    },
    ProposeOutput {
        bridge_id: BridgeId,
        output_index: OutputIndex,
        output_root: Digest,
        block_range: BlockRange,
        proposer: Address,
        finalization_deadline: u64,
    },
    DeleteOutput {
        bridge_id: BridgeId,
        output_index: OutputIndex,
        challenger: Address,
        /// Every output moved to `Deleted` by this call, in increasing order.
        deleted: Vec<OutputIndex>,
    },
    FinalizeOutput {
        bridge_id: BridgeId,
        output_index: OutputIndex,
        l2_block_number: u64,
    },
    InitiateTokenDeposit {
        bridge_id: BridgeId,
        l1_sequence: Sequence,
        from: Address,
        to: Address,
        amount: Amount,
        l1_denom: String,
        l2_denom: String,
        #[serde(with = "hex")]
        data: Vec<u8>,
    },
    FinalizeTokenWithdrawal {
        bridge_id: BridgeId,
        output_index: OutputIndex,
        l2_sequence: Sequence,
        from: Address,
        to: Address,
        amount: Amount,
        l1_denom: String,
    },
}

impl Event {
    /// The event kind, as indexed by observers.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CreateBridge { .. } => "create_bridge",
            Event::UpdateProposer { .. } => "update_proposer",
            Event::UpdateChallenger { .. } => "update_challenger",
            Event::UpdateBatchInfo { .. } => "update_batch_info",
            Event::UpdateMetadata { .. } => "update_metadata",
            Event::UpdateOracle { .. } => "update_oracle",
            Event::RegisterTokenPair { .. } => "register_token_pair",
            Event::RecordBatch { .. } => "record_batch",
            Event::ProposeOutput { .. } => "propose_output",
            Event::DeleteOutput { .. } => "delete_output",
            Event::FinalizeOutput { .. } => "finalize_output",
            Event::InitiateTokenDeposit { .. } => "initiate_token_deposit",
            Event::FinalizeTokenWithdrawal { .. } => "finalize_token_withdrawal",
        }
    }

    /// The bridge the change applies to.
    pub fn bridge_id(&self) -> BridgeId {
        match self {
            Event::CreateBridge { bridge_id, .. }
            | Event::UpdateProposer { bridge_id, .. }
            | Event::UpdateChallenger { bridge_id, .. }
            | Event::UpdateBatchInfo { bridge_id, .. }
            | Event::UpdateMetadata { bridge_id, .. }
            | Event::UpdateOracle { bridge_id, .. }
            | Event::RegisterTokenPair { bridge_id, .. }
            | Event::RecordBatch { bridge_id, .. }
            | Event::ProposeOutput { bridge_id, .. }
            | Event::DeleteOutput { bridge_id, .. }
            | Event::FinalizeOutput { bridge_id, .. }
            | Event::InitiateTokenDeposit { bridge_id, .. }
            | Event::FinalizeTokenWithdrawal { bridge_id, .. } => *bridge_id,
        }
    }
}
