//! # duoadmin core
//!
//! Request signing and execution for the Duo Admin API, independent of any
//! particular HTTP stack.
//!
//! This crate contains:
//! - Canonical request construction and HMAC-SHA1 signing
//! - Response envelope classification
//! - Offset/limit pagination
//! - The credential store and its persistence port
//! - [`AdminService`], which ties these together over a [`Transport`]
//!
//! ## Architecture Principles
//! - Depends only on `duoadmin-domain` and `duoadmin-common`
//! - No HTTP, filesystem or keychain code
//! - External effects go through traits (`Transport`, `CredentialVault`, `Clock`)

pub mod admin;
pub mod credentials;
pub mod errors;
pub mod pagination;
pub mod response;
pub mod retry;
pub mod signing;

pub use admin::{AdminService, Clock, FixedClock, RawResponse, SystemClock, Transport};
pub use credentials::{CredentialStore, CredentialVault, Credentials};
pub use errors::{security_failed, validation_failed, ValidationResultExt};
pub use pagination::{fetch_all, page_fn, PageSource, Paginator};
pub use response::{classify, decode_items, decode_payload};
pub use retry::RetryPolicy;
pub use signing::{build_auth_header, format_timestamp, sign, CanonicalRequest, RequestSigner, SignedRequest};
