use duoadmin_domain::{AdminError, ApiFailure, RequestSummary, ResponseEnvelope, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::admin::ports::RawResponse;

const BODY_EXCERPT_CHARS: usize = 200;

/// Turn a raw exchange into the `response` payload or a classified error.
///
/// The envelope decides success, not the HTTP status: a 200 with a failure
/// status is an API error, and a 4xx carrying a proper envelope is reported
/// with the remote code and message intact.
pub fn classify(raw: &RawResponse, request: &RequestSummary) -> Result<Value> {
    let envelope: ResponseEnvelope = match serde_json::from_slice(&raw.body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(http_status = raw.status, request = %request, error = %e, "response is not an envelope");
            return Err(AdminError::MalformedResponse {
                request: request.clone(),
                detail: format!(
                    "HTTP {} with unparseable body ({e}): {}",
                    raw.status,
                    excerpt(&raw.body)
                ),
            });
        }
    };

    if envelope.is_ok() {
        debug!(http_status = raw.status, request = %request, "response ok");
        return Ok(envelope.response.unwrap_or(Value::Null));
    }

    let failure = ApiFailure {
        numeric_code: envelope.numeric_code(),
        code: envelope.status,
        message: envelope.message,
        detail: envelope.message_detail,
        http_status: Some(raw.status),
        request: request.clone(),
    };
    debug!(
        http_status = raw.status,
        request = %request,
        code = ?failure.numeric_code,
        category = ?failure.category(),
        "api failure"
    );
    Err(AdminError::Api(failure))
}

/// Decode a payload into `T`, reporting shape mismatches as malformed.
pub fn decode_payload<T: DeserializeOwned>(payload: Value, request: &RequestSummary) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| AdminError::MalformedResponse {
        request: request.clone(),
        detail: format!("unexpected payload shape: {e}"),
    })
}

/// Decode a list payload. Anything other than a JSON array is malformed.
pub fn decode_items<T: DeserializeOwned>(payload: Value, request: &RequestSummary) -> Result<Vec<T>> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .map(|item| decode_payload(item, request))
            .collect(),
        other => Err(AdminError::MalformedResponse {
            request: request.clone(),
            detail: format!("expected a list payload, got {}", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut out: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    if text.chars().count() > BODY_EXCERPT_CHARS {
        out.push_str("...");
    }
    out
}
