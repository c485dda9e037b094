use op_modules_api::{CallResponse, Context, Storage, WorkingSet};
use tracing::{debug, warn};

use crate::ledger::HostLedger;
use crate::merkle::{verify_proof, WithdrawalLeaf};
use crate::{Event, OpHost, OpHostError, WithdrawalClaim};

impl<L: HostLedger> OpHost<L> {
    /// Settles a child-chain withdrawal against a finalized output, at most
    /// once per `(bridge_id, l2_sequence)`.
    ///
    /// Outputs that became due are finalized first; their events precede the
    /// withdrawal event in the response.
    pub(crate) fn finalize_withdrawal<S: Storage>(
        &self,
        claim: WithdrawalClaim,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let WithdrawalClaim {
            bridge_id,
            output_index,
            l2_sequence,
            sender,
            receiver,
            amount,
            denom,
            proof,
        } = claim;

        self.bridge_or_err(bridge_id, working_set)?;

        // A processed sequence is rejected whatever the rest of the claim says.
        let processed_key = (bridge_id, l2_sequence);
        if self.withdrawal_processed.contains(&processed_key, working_set) {
            warn!(bridge_id, l2_sequence, "Rejected replayed withdrawal");
            return Err(OpHostError::AlreadyProcessed {
                bridge_id,
                l2_sequence,
            });
        }
        if amount.is_zero() {
            return Err(OpHostError::InvalidAmount);
        }

        let mut events = self.finalize_due(bridge_id, context.block_time(), working_set);
        let output = self.finalized_output_or_err(bridge_id, output_index, working_set)?;
        self.l2_denom_or_err(bridge_id, &denom, working_set)?;

        let leaf = WithdrawalLeaf {
            bridge_id,
            l2_sequence,
            sender,
            receiver,
            amount,
            denom,
        };
        let invalid_proof = OpHostError::InvalidProof {
            bridge_id,
            output_index,
        };
        let leaf_hash = leaf.hash().map_err(|_| invalid_proof.clone())?;
        if !verify_proof(&output.output_root, leaf_hash, &proof) {
            warn!(bridge_id, output_index, l2_sequence, "Rejected withdrawal with invalid proof");
            return Err(invalid_proof);
        }

        self.withdrawal_processed
            .set(&processed_key, &true, working_set);
        self.ledger
            .credit(&leaf.receiver, amount, &leaf.denom, working_set)
            .map_err(|e| OpHostError::from_ledger(bridge_id, e))?;

        debug!(
            bridge_id,
            output_index,
            l2_sequence,
            receiver = %leaf.receiver,
            %amount,
            denom = %leaf.denom,
            "Finalized withdrawal"
        );
        events.push(Event::FinalizeTokenWithdrawal {
            bridge_id,
            output_index,
            l2_sequence,
            from: leaf.sender,
            to: leaf.receiver,
            amount,
            l1_denom: leaf.denom,
        });
        Ok(CallResponse::with_events(events))
    }
}
