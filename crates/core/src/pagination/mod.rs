//! Offset/limit pagination.
//!
//! A listing is fetched page by page, strictly in sequence. It ends at the
//! first page shorter than the page size (an empty page included), and any
//! failing page fails the whole listing.

mod paginator;

pub use paginator::{fetch_all, page_fn, PageFn, PageSource, Paginator};
