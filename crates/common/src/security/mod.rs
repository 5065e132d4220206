//! Secret handling: zeroizing strings and platform keychain access.

pub mod secure_string;

#[cfg(feature = "platform")]
pub mod keychain;

#[cfg(feature = "platform")]
pub use keychain::{KeychainError, KeychainProvider};
pub use secure_string::SecureString;
