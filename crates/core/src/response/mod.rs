//! Response envelope classification.

pub mod classifier;

pub use classifier::{classify, decode_items, decode_payload};
