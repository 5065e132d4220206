use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use duoadmin_common::SecureString;
use duoadmin_domain::constants::{
    AUTHORIZATION_HEADER, AUTH_SCHEME_PREFIX, CONTENT_TYPE_HEADER, FORM_CONTENT_TYPE,
};
use duoadmin_domain::{AdminError, HttpMethod, RequestParams, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::trace;

use super::{CanonicalRequest, SignedRequest};
use crate::credentials::Credentials;

type HmacSha1 = Hmac<Sha1>;

/// HMAC-SHA1 of `canonical` keyed with `secret_key`, as lowercase hex.
pub fn sign(canonical: &[u8], secret_key: &SecureString) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret_key.expose_bytes())
        .map_err(|e| AdminError::Security(format!("cannot key HMAC: {e}")))?;
    mac.update(canonical);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// `Basic: ` followed by base64(`integration_key:hex_digest`).
///
/// The colon-space after `Basic` is what the service expects and differs
/// from RFC 7617.
pub fn build_auth_header(integration_key: &str, hex_digest: &str) -> String {
    let token = STANDARD.encode(format!("{integration_key}:{hex_digest}"));
    format!("{AUTH_SCHEME_PREFIX}{token}")
}

/// Produces [`SignedRequest`]s for one credential set.
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    date_header: &'a str,
}

impl<'a> RequestSigner<'a> {
    pub fn new(credentials: &'a Credentials, date_header: &'a str) -> Self {
        Self { credentials, date_header }
    }

    /// Sign a request stamped with `now`.
    ///
    /// The date header carries exactly the timestamp line that was signed.
    pub fn sign_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: RequestParams,
        now: DateTime<Utc>,
    ) -> Result<SignedRequest> {
        let canonical =
            CanonicalRequest::new(method, self.credentials.api_host(), path, now, &params)?;
        let digest = sign(canonical.as_bytes(), self.credentials.secret_key())?;
        let authorization = build_auth_header(self.credentials.integration_key(), &digest);

        trace!(method = %method, path = canonical.path(), "request signed");

        let date = canonical.timestamp().to_string();
        Ok(SignedRequest::unsigned(method, canonical.host(), canonical.path(), params)
            .with_header(self.date_header, date)
            .with_header(AUTHORIZATION_HEADER, authorization)
            .with_header(CONTENT_TYPE_HEADER, FORM_CONTENT_TYPE))
    }
}
