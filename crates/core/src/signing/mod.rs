//! Request authentication: canonical request construction and HMAC signing.
//!
//! The remote verifier recomputes the canonical request from what it
//! receives, so every byte produced here has to match its reconstruction.

pub mod canonical;
pub mod request;
pub mod signer;

pub use canonical::{format_timestamp, CanonicalRequest};
pub use request::SignedRequest;
pub use signer::{build_auth_header, sign, RequestSigner};
