//! Encrypted on-disk persistence for credential sets.

pub mod document;
pub mod vault;

pub use document::CredentialDocument;
pub use vault::{EncryptedFileVault, KeySource, DEFAULT_KEYCHAIN_ACCOUNT, DEFAULT_KEYCHAIN_SERVICE};
