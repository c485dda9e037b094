use crate::Address;

/// Execution context of a single call.
///
/// The sender is the signer resolved by the authentication layer before the
/// module is invoked. Time and height come from the block that includes the
/// transaction; modules never read a clock of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    sender: Address,
    block_time: u64,
    block_height: u64,
}

impl Context {
    /// Creates a context for `sender` at the given block.
    pub fn new(sender: Address, block_time: u64, block_height: u64) -> Self {
        Self {
            sender,
            block_time,
            block_height,
        }
    }

    /// Authenticated signer of the call.
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// Block time in unix seconds.
    pub fn block_time(&self) -> u64 {
        self.block_time
    }

    /// Height of the block including the call.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Returns the same block context signed by another sender.
    pub fn with_sender(&self, sender: Address) -> Self {
        Self {
            sender,
            ..self.clone()
        }
    }
}
