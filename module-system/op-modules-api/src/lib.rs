//! Module interface of the op-bridge module system.
//!
//! A module is a deterministic state-transition component: it owns a set of
//! state containers, is initialized once at genesis and then mutated by a closed
//! set of call messages, each executed inside its own revertable transaction.

#![deny(missing_docs)]

mod address;
mod context;
mod error;
pub mod hooks;
mod module;

pub use address::{Address, AddressBech32};
pub use context::Context;
pub use error::{Bech32ParseError, ModuleError};
pub use module::{apply_call, CallResponse, Module};
pub use op_state::{Prefix, StateCheckpoint, StateMap, StateValue, Storage, WorkingSet};
