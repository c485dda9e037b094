use std::fmt;

use op_modules_api::Address;
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::types::{Amount, BlockRange, BridgeId, OutputIndex, Sequence};

/// A role a caller must hold on a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Proposer,
    Challenger,
    BatchSubmitter,
    /// The current proposer, or the module authority.
    ProposerOrAuthority,
    /// The current challenger, or the module authority.
    ChallengerOrAuthority,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            Role::Proposer => "proposer",
            Role::Challenger => "challenger",
            Role::BatchSubmitter => "batch submitter",
            Role::ProposerOrAuthority => "proposer or authority",
            Role::ChallengerOrAuthority => "challenger or authority",
        };
        f.write_str(role)
    }
}

/// The record a lookup failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Bridge(BridgeId),
    Output(BridgeId, OutputIndex),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Bridge(bridge_id) => write!(f, "bridge {}", bridge_id),
            Missing::Output(bridge_id, index) => {
                write!(f, "output {} of bridge {}", index, bridge_id)
            }
        }
    }
}

/// Every way an operation of the module can be rejected.
///
/// A rejected operation leaves no trace in state: the enclosing working set is
/// reverted by the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpHostError {
    #[error("{0} not found")]
    NotFound(Missing),

    #[error("{sender} is not the {role} of bridge {bridge_id}")]
    Unauthorized {
        bridge_id: BridgeId,
        sender: Address,
        role: Role,
    },

    #[error("invalid bridge config: {0}")]
    InvalidConfig(String),

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("block range {got} of bridge {bridge_id} must start at block {expected_start} and not end before it starts")]
    InvalidRange {
        bridge_id: BridgeId,
        expected_start: u64,
        got: BlockRange,
    },

    #[error("denom {denom:?} is not registered on bridge {bridge_id}")]
    UnsupportedDenom { bridge_id: BridgeId, denom: String },

    #[error("output root must not be empty")]
    RootEmpty,

    #[error("output {output_index} of bridge {bridge_id} is already finalized")]
    AlreadyFinalized {
        bridge_id: BridgeId,
        output_index: OutputIndex,
    },

    #[error("output {output_index} of bridge {bridge_id} is already deleted")]
    AlreadyDeleted {
        bridge_id: BridgeId,
        output_index: OutputIndex,
    },

    #[error("withdrawal {l2_sequence} of bridge {bridge_id} is already processed")]
    AlreadyProcessed {
        bridge_id: BridgeId,
        l2_sequence: Sequence,
    },

    #[error("output {output_index} of bridge {bridge_id} is not finalized")]
    NotFinalized {
        bridge_id: BridgeId,
        output_index: OutputIndex,
    },

    #[error("withdrawal proof does not match output {output_index} of bridge {bridge_id}")]
    InvalidProof {
        bridge_id: BridgeId,
        output_index: OutputIndex,
    },

    #[error("{address} holds less than {needed} {denom}")]
    InsufficientFunds {
        address: Address,
        denom: String,
        needed: Amount,
    },
}

impl OpHostError {
    pub(crate) fn bridge_not_found(bridge_id: BridgeId) -> Self {
        OpHostError::NotFound(Missing::Bridge(bridge_id))
    }

    /// Attaches the bridge being settled to a host ledger failure.
    pub(crate) fn from_ledger(bridge_id: BridgeId, err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                address,
                denom,
                needed,
            } => OpHostError::InsufficientFunds {
                address,
                denom,
                needed,
            },
            LedgerError::UnsupportedDenom { denom } => {
                OpHostError::UnsupportedDenom { bridge_id, denom }
            }
            LedgerError::Overflow { .. } => OpHostError::InvalidAmount,
        }
    }
}
