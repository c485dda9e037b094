use op_modules_api::hooks::BlockHooks;
use op_modules_api::{Context, Storage, WorkingSet};

use crate::ledger::HostLedger;
use crate::{Event, OpHost};

impl<L: HostLedger> BlockHooks for OpHost<L> {
    type Event = Event;

    /// Finalizes every output whose challenge window closed before this block.
    fn end_block_hook<S: Storage>(
        &self,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Vec<Event> {
        self.finalize_all_due(context.block_time(), working_set)
    }
}
