use op_modules_api::{CallResponse, Context, Storage, WorkingSet};
use tracing::debug;

use crate::crypto::sha3_256;
use crate::ledger::HostLedger;
use crate::{BatchInfo, BridgeId, Event, OpHost, OpHostError, Role};

impl<L: HostLedger> OpHost<L> {
    pub(crate) fn update_batch_info<S: Storage>(
        &self,
        bridge_id: BridgeId,
        batch_info: BatchInfo,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let mut bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::ProposerOrAuthority, working_set)?;

        bridge.batch_info = batch_info.clone();
        self.bridges.set(&bridge_id, &bridge, working_set);

        debug!(
            bridge_id,
            chain_type = %batch_info.chain_type,
            submitter = %batch_info.submitter,
            "Updated batch info"
        );
        Ok(Event::UpdateBatchInfo {
            bridge_id,
            batch_info,
        }
        .into())
    }

    /// Announces a batch published by the registered submitter. Only the
    /// digest and length are reported; the batch itself is not stored.
    pub(crate) fn record_batch<S: Storage>(
        &self,
        bridge_id: BridgeId,
        batch: &[u8],
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Event>, OpHostError> {
        let bridge = self.bridge_or_err(bridge_id, working_set)?;
        self.ensure_role(bridge_id, &bridge, context.sender(), Role::BatchSubmitter, working_set)?;

        let batch_hash = sha3_256(&[batch]);
        debug!(bridge_id, %batch_hash, len = batch.len(), "Recorded batch");
        Ok(Event::RecordBatch {
            bridge_id,
            submitter: *context.sender(),
            batch_hash,
            batch_len: batch.len() as u64,
        }
        .into())
    }
}
