use thiserror::Error;

/// The errors that might arise when parsing a bech32m [`crate::Address`].
#[derive(Debug, Error)]
pub enum Bech32ParseError {
    /// The string is not valid bech32.
    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
    /// The human readable part is not the one used by this chain.
    #[error("Wrong HRP: {0}")]
    WrongHRP(String),
    /// The decoded payload is not 32 bytes long.
    #[error("Wrong address length: {0}, should be 32")]
    WrongLength(usize),
}

/// General error type in the Module System.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// Custom error thrown by a module.
    #[error(transparent)]
    ModuleError(#[from] anyhow::Error),
}
