use std::fmt::Debug;

use borsh::{BorshDeserialize, BorshSerialize};
use op_state::{StateCheckpoint, Storage, WorkingSet};
use tracing::debug;

use crate::{Context, ModuleError};

/// Response type for the `Module::call` method.
///
/// Carries the change records emitted by the call, in emission order. They are
/// only meaningful if the call's writes were kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResponse<E> {
    /// Change records of the call.
    pub events: Vec<E>,
}

impl<E> Default for CallResponse<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> CallResponse<E> {
    /// A response carrying the given events.
    pub fn with_events(events: Vec<E>) -> Self {
        Self { events }
    }
}

impl<E> From<E> for CallResponse<E> {
    fn from(event: E) -> Self {
        Self {
            events: vec![event],
        }
    }
}

/// Every state-transition component implements this trait.
pub trait Module {
    /// Configuration for the genesis method.
    type Config;

    /// Module defined argument to the call method.
    type CallMessage: Debug + BorshSerialize + BorshDeserialize;

    /// Module defined event resulting from a call method.
    type Event: Debug + Clone;

    /// Genesis is called when a rollup is deployed and can be used to set initial state values in the module.
    fn genesis<S: Storage>(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<S>,
    ) -> Result<(), ModuleError>;

    /// Call allows interaction with the module and invokes state changes.
    /// It takes a module defined type and a context as parameters.
    fn call<S: Storage>(
        &self,
        message: Self::CallMessage,
        context: &Context,
        working_set: &mut WorkingSet<S>,
    ) -> Result<CallResponse<Self::Event>, ModuleError>;
}

/// Executes one call as one transaction on top of `checkpoint`.
///
/// The call's writes are kept if it succeeds and discarded if it fails, so a
/// rejected call never leaves partial state behind.
pub fn apply_call<M: Module, S: Storage>(
    module: &M,
    message: M::CallMessage,
    context: &Context,
    checkpoint: StateCheckpoint<S>,
) -> (
    Result<CallResponse<M::Event>, ModuleError>,
    StateCheckpoint<S>,
) {
    let mut working_set = checkpoint.to_revertable();
    debug!(sender = %context.sender(), height = context.block_height(), ?message, "Applying call");

    match module.call(message, context, &mut working_set) {
        Ok(response) => (Ok(response), working_set.checkpoint()),
        Err(e) => {
            debug!("Call reverted: {}", e);
            (Err(e), working_set.revert())
        }
    }
}
