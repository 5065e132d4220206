//! Protocol constants
//!
//! Header names, content types, page sizes, and fixed endpoint paths used by
//! the signing core and the resource operations.

// Transport
pub const DEFAULT_DATE_HEADER: &str = "X-Duo-Date";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Prefix of the authorization header value. The colon is part of the
/// vendor's expected framing.
pub const AUTH_SCHEME_PREFIX: &str = "Basic: ";

/// `chrono` pattern for the signed date, e.g. `Tue, 01 Jan 2030 00:00:00 -0000`.
pub const SIGNED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S -0000";

// Response envelope
pub const STATUS_OK: &str = "OK";
pub const MALFORMED_RESPONSE_CODE: &str = "MalformedResponse";

// Pagination
pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";
pub const GROUP_PAGE_SIZE: usize = 100;
pub const USER_PAGE_SIZE: usize = 300;
pub const PHONE_PAGE_SIZE: usize = 500;
pub const ADMIN_PAGE_SIZE: usize = 500;

// Endpoints
pub const PING_PATH: &str = "/auth/v2/ping";
pub const CHECK_PATH: &str = "/auth/v2/check";
pub const INFO_SUMMARY_PATH: &str = "/admin/v1/info/summary";
pub const USERS_PATH: &str = "/admin/v1/users";
pub const GROUPS_PATH: &str = "/admin/v1/groups";
pub const PHONES_PATH: &str = "/admin/v1/phones";
pub const ADMINS_PATH: &str = "/admin/v1/admins";
