use op_modules_api::{CallResponse, Context, Storage, WorkingSet};
use tracing::{debug, warn};

use crate::ledger::HostLedger;
use crate::{BridgeId, Event, OpHost, OpHostError, OutputIndex, OutputStatus, Role};

impl<L: HostLedger> OpHost<L> {
    /// Invalidates a pending output together with every pending output after
    /// it, since those were built on top of the repudiated state.
    pub(crate) fn delete_output<S: Storage>(
        &self,
        bridge_id: BridgeId,
        output_index: OutputIndex,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::Challenger, working_set)
            .map_err(|e| {
                warn!(bridge_id, output_index, sender = %context.sender(), "Rejected challenge from non-challenger");
                e
            })?;

        let output = self.output_or_err(bridge_id, output_index, working_set)?;
        match output.status {
            OutputStatus::Deleted => {
                return Err(OpHostError::AlreadyDeleted {
                    bridge_id,
                    output_index,
                })
            }
            OutputStatus::Finalized => {
                return Err(OpHostError::AlreadyFinalized {
                    bridge_id,
                    output_index,
                })
            }
            OutputStatus::Pending if output.is_due(context.block_time()) => {
                warn!(bridge_id, output_index, "Rejected challenge after the finalization deadline");
                return Err(OpHostError::AlreadyFinalized {
                    bridge_id,
                    output_index,
                });
            }
            OutputStatus::Pending => {}
        }

        let next_index = self.next_output_index.get(&bridge_id, working_set).unwrap_or(1);
        let mut deleted = Vec::new();
        for index in output_index..next_index {
            let key = (bridge_id, index);
            let Some(mut later) = self.outputs.get(&key, working_set) else {
                continue;
            };
            if later.status == OutputStatus::Pending {
                later.status = OutputStatus::Deleted;
                self.outputs.set(&key, &later, working_set);
                deleted.push(index);
            }
        }

        // Everything from `output_index` on is gone, so the proposer resumes
        // where the deleted output started.
        self.next_block_start
            .set(&bridge_id, &output.block_range.start, working_set);

        debug!(bridge_id, output_index, ?deleted, "Deleted outputs");
        Ok(Event::DeleteOutput {
            bridge_id,
            output_index,
            challenger: *context.sender(),
            deleted,
        }
        .into())
    }
}
