//! # duoadmin infrastructure
//!
//! Implementations of the `duoadmin-core` ports plus process-level setup.
//!
//! This crate contains:
//! - [`HttpTransport`], a reqwest transport for signed requests
//! - [`EncryptedFileVault`], the AES-256-GCM credential file
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//! - Typed resource operations (users, groups, phones, admins, account)
//!
//! ## Architecture
//! - Implements traits defined in `duoadmin-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod credentials;
mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{AccountApi, AdminsApi, GroupsApi, PhonesApi, UsersApi};
pub use credentials::{CredentialDocument, EncryptedFileVault, KeySource};
pub use http::{HttpTransport, HttpTransportBuilder};
pub use observability::{init_tracing, init_tracing_with, LogFormat};
