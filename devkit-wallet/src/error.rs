//! Error types for the wallet core

use thiserror::Error;

/// Custom error type for wallet core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The operating system random source could not be read
    #[error("Entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation error: {0}")]
    Derivation(String),

    /// Deliberately carries no detail about what was wrong
    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation was attempted in the wrong wizard step or while locked
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}

impl Error {
    /// Whether the user can fix this by re-entering input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidMnemonic(_) | Self::PasswordMismatch | Self::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for wallet core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::PasswordMismatch.is_recoverable());
        assert!(Error::InvalidMnemonic("bad checksum".to_string()).is_recoverable());
        assert!(!Error::EntropyUnavailable("no source".to_string()).is_recoverable());
        assert!(!Error::StorageUnavailable("read-only".to_string()).is_recoverable());
    }

    #[test]
    fn test_password_mismatch_has_no_detail() {
        assert_eq!(Error::PasswordMismatch.to_string(), "Password does not match");
    }
}
