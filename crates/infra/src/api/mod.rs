//! Typed operations over [`AdminService`](duoadmin_core::AdminService).
//!
//! Each API validates its inputs, picks the endpoint and page size, and
//! decodes the payload. Signing, retries and classification happen in the
//! service.

pub mod account;
pub mod admins;
pub mod groups;
pub mod phones;
pub mod users;

pub use account::AccountApi;
pub use admins::AdminsApi;
pub use groups::GroupsApi;
pub use phones::PhonesApi;
pub use users::UsersApi;

/// Percent-encode one path segment.
pub(crate) fn path_segment(base: &str, id: &str) -> String {
    format!("{}/{}", base, urlencoding::encode(id))
}
