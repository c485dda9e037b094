use op_modules_api::{Address, CallResponse, Context, Storage, WorkingSet};
use tracing::debug;

use crate::ledger::HostLedger;
use crate::{Amount, BridgeId, DepositRecord, Event, OpHost, OpHostError};

impl<L: HostLedger> OpHost<L> {
    /// Locks `amount` of `denom` from the signer and sequences the transfer
    /// for the child chain.
    ///
    /// The sequence is only consumed once the ledger debit went through.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn initiate_deposit<S: Storage>(
        &self,
        bridge_id: BridgeId,
        receiver: Address,
        amount: Amount,
        denom: String,
        hook: Option<Vec<u8>>,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        if amount.is_zero() {
            return Err(OpHostError::InvalidAmount);
        }
        self.bridge_or_err(bridge_id, working_set)?;
        let l2_denom = self.l2_denom_or_err(bridge_id, &denom, working_set)?;

        let sender = *context.sender();
        self.ledger
            .debit(&sender, amount, &denom, working_set)
            .map_err(|e| OpHostError::from_ledger(bridge_id, e))?;

        let l1_sequence = self.next_l1_sequence.get(&bridge_id, working_set).unwrap_or(1);
        self.next_l1_sequence
            .set(&bridge_id, &(l1_sequence + 1), working_set);

        let record = DepositRecord {
            sender,
            receiver,
            amount,
            l1_denom: denom,
            l2_denom,
            hook,
            block_height: context.block_height(),
        };
        self.deposits
            .set(&(bridge_id, l1_sequence), &record, working_set);

        debug!(
            bridge_id,
            l1_sequence,
            %sender,
            %receiver,
            %amount,
            denom = %record.l1_denom,
            "Initiated deposit"
        );
        Ok(Event::InitiateTokenDeposit {
            bridge_id,
            l1_sequence,
            from: sender,
            to: receiver,
            amount,
            l1_denom: record.l1_denom,
            l2_denom: record.l2_denom,
            data: record.hook.unwrap_or_default(),
        }
        .into())
    }
}
