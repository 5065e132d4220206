//! Error type for the common primitives.
//!
//! Higher layers convert `CommonError` into their own error type; nothing in
//! this crate knows about requests or credentials.

use thiserror::Error;

/// Errors raised by the encryption, keychain, and serialization helpers.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("Encryption error: {0}")]
    Crypto(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CommonError {
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result alias for common operations
pub type CommonResult<T> = Result<T, CommonError>;
