use std::fmt;

use duoadmin_domain::constants::{AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER};
use duoadmin_domain::{HttpMethod, RequestParams, RequestSummary};

/// A request ready for the transport: target, encoded parameters and headers.
///
/// For GET and DELETE the encoded parameters travel as the query string; for
/// POST and PUT they travel as a form body. Either way they are byte-for-byte
/// the last canonical line.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: HttpMethod,
    pub host: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
    pub params: RequestParams,
}

impl SignedRequest {
    /// Build the wire shape without authentication headers.
    pub fn unsigned(method: HttpMethod, host: &str, path: &str, params: RequestParams) -> Self {
        let encoded = params.to_form_body();
        let (query, body) = if method.sends_body() {
            (None, Some(encoded))
        } else if encoded.is_empty() {
            (None, None)
        } else {
            (Some(encoded), None)
        };

        Self {
            method,
            host: host.trim().to_lowercase(),
            path: path.trim().to_string(),
            query,
            body,
            headers: Vec::new(),
            params,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `https://{host}{path}[?query]`
    pub fn url(&self) -> String {
        match &self.query {
            Some(query) => format!("https://{}{}?{}", self.host, self.path, query),
            None => format!("https://{}{}", self.host, self.path),
        }
    }

    /// Path plus query, for transports that resolve against their own base URL.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE_HEADER)
    }

    pub fn is_signed(&self) -> bool {
        self.header(AUTHORIZATION_HEADER).is_some()
    }

    pub fn summary(&self) -> RequestSummary {
        RequestSummary::new(self.method.as_str(), self.path.clone(), self.params.as_map().clone())
    }
}

// Authorization must never reach logs.
impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
                    (name.as_str(), "[REDACTED]")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("SignedRequest")
            .field("method", &self.method)
            .field("host", &self.host)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("headers", &headers)
            .finish()
    }
}
