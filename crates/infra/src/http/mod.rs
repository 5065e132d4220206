//! HTTPS transport for signed requests.

pub mod client;

pub use client::{HttpTransport, HttpTransportBuilder};
