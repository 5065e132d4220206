//! Conversions from external infrastructure errors into [`AdminError`].

use duoadmin_domain::{AdminError, RequestSummary};
use reqwest::Error as HttpError;

/// Map a reqwest failure for `request` onto [`AdminError::Transport`].
///
/// A timeout leaves the remote effect of the request unknown; the message
/// says so.
pub(crate) fn transport_failure(err: &HttpError, request: RequestSummary) -> AdminError {
    let message = if err.is_timeout() {
        "request timed out; outcome unknown".to_string()
    } else if is_connect(err) {
        format!("connection failed: {err}")
    } else if err.is_body() || err.is_decode() {
        format!("failed to read response body: {err}")
    } else if err.is_builder() {
        format!("request could not be built: {err}")
    } else {
        err.to_string()
    };
    AdminError::Transport { request, message }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(err: &HttpError) -> bool {
    err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_err: &HttpError) -> bool {
    false
}

pub(crate) fn config_io_failure(context: &str, err: std::io::Error) -> AdminError {
    AdminError::Config(format!("{context}: {err}"))
}

pub(crate) fn vault_io_failure(context: &str, err: std::io::Error) -> AdminError {
    AdminError::Security(format!("{context}: {err}"))
}
