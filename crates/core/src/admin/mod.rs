//! Signed request execution against the Admin API.

pub mod ports;
pub mod service;

pub use ports::{Clock, FixedClock, RawResponse, SystemClock, Transport};
pub use service::AdminService;
