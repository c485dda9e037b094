use op_modules_api::{Address, Storage, WorkingSet};
use serde::{Deserialize, Serialize};

use crate::ledger::{Bank, HostLedger};
use crate::{
    Amount, BridgeConfig, BridgeId, DepositRecord, OpHost, Output, OutputIndex, Sequence,
};

/// A bridge together with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub bridge_id: BridgeId,
    pub config: BridgeConfig,
}

impl<L: HostLedger> OpHost<L> {
    /// Privileged address set at genesis.
    pub fn authority<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Option<Address> {
        self.authority.get(working_set)
    }

    pub fn bridge<S: Storage>(
        &self,
        bridge_id: BridgeId,
        working_set: &mut WorkingSet<S>,
    ) -> Option<BridgeResponse> {
        self.bridges
            .get(&bridge_id, working_set)
            .map(|config| BridgeResponse { bridge_id, config })
    }

    /// Every registered bridge, in id order.
    pub fn bridges<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Vec<BridgeResponse> {
        let next_bridge_id = self.next_bridge_id.get(working_set).unwrap_or(1);
        (1..next_bridge_id)
            .filter_map(|bridge_id| self.bridge(bridge_id, working_set))
            .collect()
    }

    /// The stored output, in whatever state it is.
    pub fn output<S: Storage>(
        &self,
        bridge_id: BridgeId,
        output_index: OutputIndex,
        working_set: &mut WorkingSet<S>,
    ) -> Option<Output> {
        self.outputs.get(&(bridge_id, output_index), working_set)
    }

    /// Index the next proposal of the bridge will take.
    pub fn next_output_index<S: Storage>(
        &self,
        bridge_id: BridgeId,
        working_set: &mut WorkingSet<S>,
    ) -> OutputIndex {
        self.next_output_index.get(&bridge_id, working_set).unwrap_or(1)
    }

    /// First child-chain block the next proposal of the bridge must cover.
    pub fn next_block_start<S: Storage>(
        &self,
        bridge_id: BridgeId,
        working_set: &mut WorkingSet<S>,
    ) -> u64 {
        self.next_block_start.get(&bridge_id, working_set).unwrap_or(1)
    }

    pub fn last_finalized_output_index<S: Storage>(
        &self,
        bridge_id: BridgeId,
        working_set: &mut WorkingSet<S>,
    ) -> Option<OutputIndex> {
        self.last_finalized_index.get(&bridge_id, working_set)
    }

    /// Sequence the next deposit of the bridge will take.
    pub fn next_l1_sequence<S: Storage>(
        &self,
        bridge_id: BridgeId,
        working_set: &mut WorkingSet<S>,
    ) -> Sequence {
        self.next_l1_sequence.get(&bridge_id, working_set).unwrap_or(1)
    }

    pub fn deposit<S: Storage>(
        &self,
        bridge_id: BridgeId,
        l1_sequence: Sequence,
        working_set: &mut WorkingSet<S>,
    ) -> Option<DepositRecord> {
        self.deposits.get(&(bridge_id, l1_sequence), working_set)
    }

    pub fn is_withdrawal_processed<S: Storage>(
        &self,
        bridge_id: BridgeId,
        l2_sequence: Sequence,
        working_set: &mut WorkingSet<S>,
    ) -> bool {
        self.withdrawal_processed
            .get(&(bridge_id, l2_sequence), working_set)
            .unwrap_or(false)
    }

    /// Child-chain denom paired with `l1_denom` on the bridge.
    pub fn token_pair<S: Storage>(
        &self,
        bridge_id: BridgeId,
        l1_denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Option<String> {
        self.token_pairs
            .get(&(bridge_id, l1_denom.to_owned()), working_set)
    }
}

impl OpHost<Bank> {
    /// Host balance of `address` in the reference ledger.
    pub fn balance<S: Storage>(
        &self,
        address: &Address,
        denom: &str,
        working_set: &mut WorkingSet<S>,
    ) -> Amount {
        self.ledger.balance(address, denom, working_set)
    }
}
