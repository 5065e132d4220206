//! Platform keychain provider
//!
//! Thin wrapper over the OS credential store (macOS Keychain, Windows
//! Credential Manager, Linux Secret Service). The credential vault keeps the
//! key that encrypts the credential file here, which ties the file to the OS
//! user that wrote it.
//!
//! ```no_run
//! use duoadmin_common::security::keychain::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("duoadmin");
//! let key = keychain.get_or_create_key("credential-file")?;
//! assert_eq!(key.len(), 64);
//! # Ok::<(), duoadmin_common::security::KeychainError>(())
//! ```

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

use super::SecureString;
use crate::crypto::EncryptionService;
use crate::error::CommonError;

/// Errors from keychain access
#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("Keychain entry not found")]
    NotFound,

    #[error("Keychain access failed: {0}")]
    AccessFailed(String),
}

impl From<KeychainError> for CommonError {
    fn from(err: KeychainError) -> Self {
        Self::Keychain(err.to_string())
    }
}

/// Keychain access scoped to one service name
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Store a secret under `account`, replacing any previous value.
    pub fn set_secret(&self, account: &str, value: &SecureString) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, account = %account, "Storing secret in keychain");

        self.entry(account)?.set_password(value.expose()).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to store secret for {account}: {e}"))
        })
    }

    /// Retrieve the secret stored under `account`.
    pub fn get_secret(&self, account: &str) -> Result<SecureString, KeychainError> {
        debug!(service = %self.service_name, account = %account, "Retrieving secret from keychain");

        self.entry(account)?.get_password().map(SecureString::new).map_err(|e| match e {
            keyring::Error::NoEntry => KeychainError::NotFound,
            other => KeychainError::AccessFailed(format!(
                "Failed to retrieve secret for {account}: {other}"
            )),
        })
    }

    /// Delete the secret stored under `account`. Missing entries are not an
    /// error.
    pub fn delete_secret(&self, account: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, account = %account, "Deleting secret from keychain");

        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {account}: {e}"
            ))),
        }
    }

    /// Return the hex-encoded 256-bit key stored under `account`, generating
    /// and storing a fresh one on first use.
    pub fn get_or_create_key(&self, account: &str) -> Result<SecureString, KeychainError> {
        match self.get_secret(account) {
            Ok(key) => Ok(key),
            Err(KeychainError::NotFound) => {
                debug!(service = %self.service_name, account = %account, "Generating new key");
                let key = SecureString::new(hex::encode(EncryptionService::generate_key()));
                self.set_secret(account, &key)?;
                Ok(key)
            }
            Err(e) => Err(e),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, account).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to open keychain entry {account}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keychain_errors_convert_to_common_errors() {
        let err: CommonError = KeychainError::NotFound.into();
        assert!(matches!(err, CommonError::Keychain(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn provider_keeps_service_name() {
        let keychain = KeychainProvider::new("duoadmin.test");
        assert_eq!(keychain.service_name(), "duoadmin.test");
    }
}
