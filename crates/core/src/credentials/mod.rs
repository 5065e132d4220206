//! Credential material and the process-wide store that guards it.

pub mod model;
pub mod ports;
pub mod store;

pub use model::Credentials;
pub use ports::CredentialVault;
pub use store::CredentialStore;
