use op_modules_api::{CallResponse, Context, Storage, WorkingSet};
use tracing::{debug, info};

use crate::error::Missing;
use crate::ledger::HostLedger;
use crate::{
    BlockRange, BridgeId, Digest, Event, OpHost, OpHostError, Output, OutputIndex, OutputStatus,
    Role,
};

impl<L: HostLedger> OpHost<L> {
    pub(crate) fn propose_output<S: Storage>(
        &self,
        bridge_id: BridgeId,
        output_root: Digest,
        block_range: BlockRange,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::Proposer, working_set)?;

        if output_root.is_zero() {
            return Err(OpHostError::RootEmpty);
        }

        let expected_start = self.next_block_start(bridge_id, working_set);
        let invalid_range = OpHostError::InvalidRange {
            bridge_id,
            expected_start,
            got: block_range,
        };
        if block_range.start != expected_start || block_range.end < block_range.start {
            return Err(invalid_range);
        }
        // The range after this one must still have a representable start.
        let next_block_start = block_range.end.checked_add(1).ok_or(invalid_range)?;

        let output_index = self.next_output_index.get(&bridge_id, working_set).unwrap_or(1);
        let proposed_at = context.block_time();
        let finalization_deadline = proposed_at.saturating_add(bridge.finalization_period);
        let output = Output {
            output_root,
            block_range,
            proposed_at,
            finalization_deadline,
            oracle_enabled: bridge.oracle_enabled,
            status: OutputStatus::Pending,
        };
        self.outputs.set(&(bridge_id, output_index), &output, working_set);
        self.next_output_index
            .set(&bridge_id, &(output_index + 1), working_set);
        self.next_block_start
            .set(&bridge_id, &next_block_start, working_set);

        debug!(
            bridge_id,
            output_index,
            %output_root,
            %block_range,
            finalization_deadline,
            "Proposed output"
        );
        Ok(Event::ProposeOutput {
            bridge_id,
            output_index,
            output_root,
            block_range,
            proposer: *context.sender(),
            finalization_deadline,
        }
        .into())
    }

    /// Finalizes, in index order, every pending output of the bridge whose
    /// challenge window closed before `now`.
    ///
    /// Stops at the first pending output still in its window, so the finalized
    /// outputs always form a prefix of the non-deleted ones. Running it again
    /// without time passing changes nothing.
    pub fn finalize_due<S: Storage>(
        &self,
        bridge_id: BridgeId,
        now: u64,
        working_set: &mut WorkingSet<S>,
    ) -> Vec<Event> {
        let next_index = self.next_output_index.get(&bridge_id, working_set).unwrap_or(1);
        let start = self.finalize_cursor.get(&bridge_id, working_set).unwrap_or(1);

        let mut cursor = start;
        let mut events = Vec::new();
        while cursor < next_index {
            let key = (bridge_id, cursor);
            let Some(mut output) = self.outputs.get(&key, working_set) else {
                break;
            };
            if output.status == OutputStatus::Pending {
                if !output.is_due(now) {
                    break;
                }
                output.status = OutputStatus::Finalized;
                self.outputs.set(&key, &output, working_set);
                self.last_finalized_index.set(&bridge_id, &cursor, working_set);

                info!(bridge_id, output_index = cursor, "Finalized output");
                events.push(Event::FinalizeOutput {
                    bridge_id,
                    output_index: cursor,
                    l2_block_number: output.block_range.end,
                });
            }
            cursor += 1;
        }

        if cursor != start {
            self.finalize_cursor.set(&bridge_id, &cursor, working_set);
        }
        events
    }

    /// Runs [`Self::finalize_due`] over every registered bridge.
    pub fn finalize_all_due<S: Storage>(
        &self,
        now: u64,
        working_set: &mut WorkingSet<S>,
    ) -> Vec<Event> {
        let next_bridge_id = self.next_bridge_id.get(working_set).unwrap_or(1);
        (1..next_bridge_id)
            .flat_map(|bridge_id| self.finalize_due(bridge_id, now, working_set))
            .collect()
    }

    /// Returns the output if it is finalized as of `now`, sweeping due outputs
    /// first.
    pub fn get_finalized_output<S: Storage>(
        &self,
        bridge_id: BridgeId,
        output_index: OutputIndex,
        now: u64,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Output, OpHostError> {
        self.bridge_or_err(bridge_id, working_set)?;
        self.finalize_due(bridge_id, now, working_set);
        self.finalized_output_or_err(bridge_id, output_index, working_set)
    }

    pub(crate) fn finalized_output_or_err<S: Storage>(
        &self,
        bridge_id: BridgeId,
        output_index: OutputIndex,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Output, OpHostError> {
        let output = self.output_or_err(bridge_id, output_index, working_set)?;
        if output.status != OutputStatus::Finalized {
            return Err(OpHostError::NotFinalized {
                bridge_id,
                output_index,
            });
        }
        Ok(output)
    }

    pub(crate) fn output_or_err<S: Storage>(
        &self,
        bridge_id: BridgeId,
        output_index: OutputIndex,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Output, OpHostError> {
        self.outputs
            .get(&(bridge_id, output_index), working_set)
            .ok_or(OpHostError::NotFound(Missing::Output(bridge_id, output_index)))
    }
}
