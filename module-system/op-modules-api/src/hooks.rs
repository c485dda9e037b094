//! Hooks a module runs around the calls of a block.

use op_state::{Storage, WorkingSet};

use crate::Context;

/// Block-level hooks, run by the block executor outside of any call.
pub trait BlockHooks {
    /// Change records emitted by the hooks.
    type Event;

    /// Runs before the first call of the block.
    fn begin_block_hook<S: Storage>(
        &self,
        _context: &Context,
        _working_set: &mut WorkingSet<S>,
    ) -> Vec<Self::Event> {
        Vec::new()
    }

    /// Runs after the last call of the block.
    fn end_block_hook<S: Storage>(
        &self,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Vec<Self::Event>;
}
