//! # duoadmin Domain
//!
//! Value types shared by every duoadmin crate.
//!
//! This crate contains:
//! - The error taxonomy (`AdminError`) and `Result` alias
//! - Request/response value types (methods, parameters, envelopes)
//! - Client configuration structures
//! - Protocol constants (headers, page sizes, endpoint paths)
//!
//! ## Architecture
//! - No dependencies on other duoadmin crates
//! - Only external dependencies allowed
//! - Pure data, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
