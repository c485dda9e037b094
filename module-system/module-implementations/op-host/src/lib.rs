//! Host-chain side of an optimistic bridge.
//!
//! The module keeps, per bridge, an ordered sequence of child-chain output
//! roots that the proposer submits and the challenger may invalidate while
//! their challenge window is open. Deposits lock host funds and are sequenced
//! for the child chain; withdrawals release host funds once proven against a
//! finalized output.

mod batch;
pub mod call;
mod challenge;
pub mod config;
mod crypto;
mod deposit;
mod error;
mod event;
pub mod genesis;
mod hooks;
pub mod ledger;
pub mod merkle;
mod oracle;
mod output;
mod query;
mod registry;
mod types;
mod withdrawal;


pub use call::{CallMessage, WithdrawalClaim};
pub use crypto::{l2_denom, sha3_256};
pub use error::{Missing, OpHostError, Role};
pub use event::Event;
pub use genesis::{BridgeGenesis, OpHostConfig};
pub use query::BridgeResponse;
use ledger::{Bank, HostLedger};
use op_modules_api::{
    Address, CallResponse, Context, Module, ModuleError, Prefix, StateMap, StateValue, Storage,
    WorkingSet,
};
pub use types::*;

/// The `op-host` module.
///
/// Generic over the host ledger it settles deposits and withdrawals against;
/// [`Bank`] is the state-backed default.
#[derive(Debug, Clone)]
pub struct OpHost<L: HostLedger = Bank> {
    /// Privileged address allowed to rotate roles on any bridge.
    pub(crate) authority: StateValue<Address>,

    pub(crate) next_bridge_id: StateValue<BridgeId>,
    pub(crate) bridges: StateMap<BridgeId, BridgeConfig>,
    /// `(bridge_id, l1_denom) -> l2_denom`
    pub(crate) token_pairs: StateMap<(BridgeId, String), String>,

    pub(crate) outputs: StateMap<(BridgeId, OutputIndex), Output>,
    pub(crate) next_output_index: StateMap<BridgeId, OutputIndex>,
    /// First child-chain block the next proposal must cover.
    pub(crate) next_block_start: StateMap<BridgeId, u64>,
    /// Lowest index that may still be pending.
    pub(crate) finalize_cursor: StateMap<BridgeId, OutputIndex>,
    pub(crate) last_finalized_index: StateMap<BridgeId, OutputIndex>,

    pub(crate) next_l1_sequence: StateMap<BridgeId, Sequence>,
    pub(crate) deposits: StateMap<(BridgeId, Sequence), DepositRecord>,
    pub(crate) withdrawal_processed: StateMap<(BridgeId, Sequence), bool>,

    pub(crate) ledger: L,
}

const MODULE_PREFIX: &str = "op_host/";

impl Default for OpHost<Bank> {
    fn default() -> Self {
        Self::new(Bank::new(&Prefix::from(MODULE_PREFIX).extended(b"bank/")))
    }
}

impl<L: HostLedger> OpHost<L> {
    /// Creates the module on top of `ledger`.
    pub fn new(ledger: L) -> Self {
        let prefix = Prefix::from(MODULE_PREFIX);
        let state = |name: &str| prefix.extended(name.as_bytes());
        Self {
            authority: StateValue::new(state("authority")),
            next_bridge_id: StateValue::new(state("next_bridge_id")),
            bridges: StateMap::new(state("bridges/")),
            token_pairs: StateMap::new(state("token_pairs/")),
            outputs: StateMap::new(state("outputs/")),
            next_output_index: StateMap::new(state("next_output_index/")),
            next_block_start: StateMap::new(state("next_block_start/")),
            finalize_cursor: StateMap::new(state("finalize_cursor/")),
            last_finalized_index: StateMap::new(state("last_finalized_index/")),
            next_l1_sequence: StateMap::new(state("next_l1_sequence/")),
            deposits: StateMap::new(state("deposits/")),
            withdrawal_processed: StateMap::new(state("withdrawal_processed/")),
            ledger,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Executes `msg` with typed errors. [`Module::call`] wraps this.
    pub fn dispatch<S: Storage>(
        &self,
        msg: CallMessage,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        match msg {
            CallMessage::RegisterBridge { config, l1_denoms } => {
                self.register_bridge(config, l1_denoms, context, working_set)
            }
            CallMessage::UpdateProposer {
                bridge_id,
                new_proposer,
            } => self.update_proposer(bridge_id, new_proposer, context, working_set),
            CallMessage::UpdateChallenger {
                bridge_id,
                new_challenger,
            } => self.update_challenger(bridge_id, new_challenger, context, working_set),
            CallMessage::UpdateBatchInfo {
                bridge_id,
                batch_info,
            } => self.update_batch_info(bridge_id, batch_info, context, working_set),
            CallMessage::UpdateMetadata {
                bridge_id,
                metadata,
            } => self.update_metadata(bridge_id, metadata, context, working_set),
            CallMessage::SetOracleEnabled { bridge_id, enabled } => {
                self.set_oracle_enabled(bridge_id, enabled, context, working_set)
            }
            CallMessage::RegisterTokenPair {
                bridge_id,
                l1_denom,
            } => self.register_token_pair(bridge_id, l1_denom, context, working_set),
            CallMessage::RecordBatch { bridge_id, batch } => {
                self.record_batch(bridge_id, &batch, context, working_set)
            }
            CallMessage::ProposeOutput {
                bridge_id,
                output_root,
                block_range,
            } => self.propose_output(bridge_id, output_root, block_range, context, working_set),
            CallMessage::DeleteOutput {
                bridge_id,
                output_index,
            } => self.delete_output(bridge_id, output_index, context, working_set),
            CallMessage::InitiateDeposit {
                bridge_id,
                receiver,
                amount,
                denom,
                hook,
            } => self.initiate_deposit(bridge_id, receiver, amount, denom, hook, context, working_set),
            CallMessage::FinalizeWithdrawal(claim) => {
                self.finalize_withdrawal(claim, context, working_set)
            }
        }
    }
}

impl<L: HostLedger> Module for OpHost<L> {
    type Config = OpHostConfig<L::Config>;

    type CallMessage = CallMessage;

    type Event = Event;

    fn genesis<S: Storage>(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), ModuleError> {
        Ok(self.init_module(config, working_set)?)
    }

    fn call<S: Storage>(
        &self,
        msg: Self::CallMessage,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Self::Event>, ModuleError> {
        Ok(self
            .dispatch(msg, context, working_set)
            .map_err(anyhow::Error::from)?)
    }
}
