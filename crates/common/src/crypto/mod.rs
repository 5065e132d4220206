//! Symmetric encryption used for data at rest.

pub mod encryption;

pub use encryption::{EncryptedData, EncryptionService};
