//! Admin API service - signs, sends, classifies and paginates requests

use std::sync::Arc;

use chrono::{DateTime, Utc};
use duoadmin_domain::constants::{DEFAULT_DATE_HEADER, LIMIT_PARAM, OFFSET_PARAM, PING_PATH};
use duoadmin_domain::{ClientConfig, HttpMethod, RequestParams, RequestSummary, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::ports::{Clock, SystemClock, Transport};
use crate::credentials::CredentialStore;
use crate::pagination::{fetch_all, page_fn};
use crate::response::{classify, decode_items, decode_payload};
use crate::retry::RetryPolicy;
use crate::signing::canonical::validate_path;
use crate::signing::{RequestSigner, SignedRequest};

/// Admin API service
///
/// Every attempt of every request is signed with a fresh timestamp from the
/// clock. Requests issued through one service are independent; there is no
/// ordering between concurrent callers.
pub struct AdminService {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    date_header: String,
}

impl AdminService {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            transport,
            credentials,
            clock: Arc::new(SystemClock),
            retry: RetryPolicy::default(),
            date_header: DEFAULT_DATE_HEADER.to_string(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_date_header(mut self, name: impl Into<String>) -> Self {
        self.date_header = name.into();
        self
    }

    /// Apply retry and header settings from a loaded configuration.
    pub fn with_config(self, config: &ClientConfig) -> Self {
        self.with_retry_policy(config.retry.into()).with_date_header(config.date_header.clone())
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Sign and send one request, returning the `response` payload.
    #[instrument(skip(self, params), fields(method = %method, path = %path))]
    pub async fn request(&self, method: HttpMethod, path: &str, params: RequestParams) -> Result<Value> {
        let credentials = self.credentials.get()?;
        let signer = RequestSigner::new(&credentials, &self.date_header);

        self.execute(method, |now| signer.sign_request(method, path, params.clone(), now)).await
    }

    /// Like [`request`](Self::request), decoding the payload into `T`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: RequestParams,
    ) -> Result<T> {
        let summary = RequestSummary::new(method.as_str(), path, params.as_map().clone());
        let payload = self.request(method, path, params).await?;
        decode_payload(payload, &summary)
    }

    /// Fetch every page of a listing endpoint.
    ///
    /// `limit` and `offset` are added to `params` for each page. The result is
    /// all-or-nothing.
    #[instrument(skip(self, params), fields(method = %method, path = %path))]
    pub async fn request_all<T: DeserializeOwned + Send>(
        &self,
        method: HttpMethod,
        path: &str,
        params: RequestParams,
        page_size: usize,
    ) -> Result<Vec<T>> {
        let service = self;
        let base = &params;
        let source = page_fn(move |offset: usize| {
            let page_params = base
                .clone()
                .with(LIMIT_PARAM, page_size.to_string())
                .with(OFFSET_PARAM, offset.to_string());
            let summary = RequestSummary::new(method.as_str(), path, page_params.as_map().clone());
            async move {
                let payload = service.request(method, path, page_params).await?;
                decode_items(payload, &summary)
            }
        });

        fetch_all(source, page_size).await
    }

    /// Send a request without authentication headers (e.g. the ping endpoint).
    #[instrument(skip(self, params), fields(method = %method, path = %path))]
    pub async fn request_unsigned(
        &self,
        method: HttpMethod,
        path: &str,
        params: RequestParams,
    ) -> Result<Value> {
        let path = path.trim();
        validate_path(path)?;
        let credentials = self.credentials.get()?;
        let request = SignedRequest::unsigned(method, credentials.api_host(), path, params);

        self.execute(method, |_| Ok(request.clone())).await
    }

    /// Liveness check; needs only the API host.
    pub async fn ping(&self) -> Result<Value> {
        self.request_unsigned(HttpMethod::Get, PING_PATH, RequestParams::new()).await
    }

    async fn execute<B>(&self, method: HttpMethod, build: B) -> Result<Value>
    where
        B: Fn(DateTime<Utc>) -> Result<SignedRequest> + Send,
    {
        let mut attempt = 1u32;
        loop {
            let request = build(self.clock.now())?;
            match self.exchange(&request).await {
                Ok(payload) => {
                    debug!(attempt, "request succeeded");
                    return Ok(payload);
                }
                Err(err) if self.retry.should_retry(&err, method, attempt) => {
                    warn!(attempt, error = %err, "request failed, retrying");
                    self.retry.wait(attempt).await;
                    attempt += 1;
                }
                Err(err) => {
                    debug!(attempt, error = %err, "request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn exchange(&self, request: &SignedRequest) -> Result<Value> {
        let raw = self.transport.send(request).await?;
        classify(&raw, &request.summary())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use duoadmin_common::SecureString;
    use duoadmin_domain::AdminError;
    use parking_lot::Mutex;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::admin::ports::{FixedClock, RawResponse};
    use crate::signing::build_auth_header;

    enum Reply {
        Json(u16, Value),
        Text(u16, &'static str),
        Fail,
    }

    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Reply>>,
        sent: Mutex<Vec<SignedRequest>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self { replies: Mutex::new(replies.into()), sent: Mutex::default() })
        }

        fn sent(&self) -> Vec<SignedRequest> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &SignedRequest) -> Result<RawResponse> {
            self.sent.lock().push(request.clone());
            let reply = self.replies.lock().pop_front();
            match reply {
                Some(Reply::Json(status, body)) => Ok(RawResponse::new(status, body.to_string())),
                Some(Reply::Text(status, body)) => Ok(RawResponse::new(status, body)),
                Some(Reply::Fail) | None => Err(AdminError::Transport {
                    request: request.summary(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    /// Advances one second per reading.
    struct SteppingClock(AtomicI64);

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let step = self.0.fetch_add(1, Ordering::SeqCst);
            new_year_2030() + chrono::Duration::seconds(step)
        }
    }

    fn new_year_2030() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn ok(payload: Value) -> Reply {
        Reply::Json(200, json!({"stat": "OK", "response": payload}))
    }

    fn configured_store() -> Arc<CredentialStore> {
        let store = CredentialStore::new();
        store
            .initialize(
                "DIXXXXXXXXXXXXXXXXXX",
                SecureString::new("SKEYsecretsecretsecretsecretsecretsecret"),
                "api-1234.example.com",
                None,
            )
            .unwrap();
        Arc::new(store)
    }

    fn service(transport: Arc<ScriptedTransport>) -> AdminService {
        AdminService::new(transport, configured_store())
            .with_clock(Arc::new(FixedClock(new_year_2030())))
            .with_retry_policy(RetryPolicy::new(3, Duration::ZERO))
    }

    #[tokio::test]
    async fn unconfigured_service_sends_nothing() {
        let transport = ScriptedTransport::with(vec![ok(json!([]))]);
        let service = AdminService::new(transport.clone(), Arc::new(CredentialStore::new()));

        let err = service.request(HttpMethod::Get, "/admin/v1/users", RequestParams::new()).await.unwrap_err();
        assert_eq!(err, AdminError::NotConfigured);
        assert!(service.ping().await.is_err());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn signs_with_clock_timestamp() {
        let transport = ScriptedTransport::with(vec![ok(json!([]))]);
        let params = RequestParams::new().with("limit", "300").with("offset", "0");

        let payload = service(transport.clone())
            .request(HttpMethod::Get, "/admin/v1/users", params)
            .await
            .unwrap();
        assert_eq!(payload, json!([]));

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].header("X-Duo-Date"), Some("Tue, 01 Jan 2030 00:00:00 -0000"));
        assert_eq!(
            sent[0].header("Authorization").map(str::to_string),
            Some(build_auth_header("DIXXXXXXXXXXXXXXXXXX", "477620eebc316c8d02bd07c354f06f5a9c296449"))
        );
        assert_eq!(sent[0].url(), "https://api-1234.example.com/admin/v1/users?limit=300&offset=0");
    }

    #[tokio::test]
    async fn retries_idempotent_transport_failures_with_fresh_signatures() {
        let transport = ScriptedTransport::with(vec![Reply::Fail, Reply::Fail, ok(json!({"ok": true}))]);
        let service = service(transport.clone()).with_clock(Arc::new(SteppingClock(AtomicI64::new(0))));

        let payload = service.request(HttpMethod::Get, "/auth/v2/check", RequestParams::new()).await.unwrap();
        assert_eq!(payload, json!({"ok": true}));

        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        let dates: Vec<_> = sent.iter().map(|r| r.header("X-Duo-Date").unwrap_or_default()).collect();
        assert_eq!(dates, vec![
            "Tue, 01 Jan 2030 00:00:00 -0000",
            "Tue, 01 Jan 2030 00:00:01 -0000",
            "Tue, 01 Jan 2030 00:00:02 -0000",
        ]);
        assert_ne!(sent[0].header("Authorization"), sent[1].header("Authorization"));
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let transport = ScriptedTransport::with(vec![Reply::Fail, Reply::Fail, Reply::Fail, ok(json!([]))]);
        let err = service(transport.clone())
            .request(HttpMethod::Delete, "/admin/v1/users/DU1", RequestParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Transport { .. }));
        assert_eq!(transport.sent().len(), 3);
    }

    #[tokio::test]
    async fn non_idempotent_transport_failure_is_not_retried() {
        let transport = ScriptedTransport::with(vec![Reply::Fail, ok(json!({}))]);
        let params = RequestParams::new().with("username", "jdoe");
        let err = service(transport.clone())
            .request(HttpMethod::Post, "/admin/v1/users", params)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Transport { .. }));
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.sent()[0].body.as_deref(), Some("username=jdoe"));
    }

    #[tokio::test]
    async fn malformed_response_retried_once() {
        let transport = ScriptedTransport::with(vec![
            Reply::Text(502, "bad gateway"),
            Reply::Text(502, "bad gateway"),
            ok(json!([])),
        ]);
        let err = service(transport.clone())
            .request(HttpMethod::Get, "/admin/v1/users", RequestParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::MalformedResponse { .. }));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn api_failure_surfaces_immediately() {
        let transport = ScriptedTransport::with(vec![Reply::Json(
            401,
            json!({"stat": "FAIL", "code": 40103, "message": "Invalid signature in request credentials"}),
        )]);
        let err = service(transport.clone())
            .request(HttpMethod::Get, "/admin/v1/users", RequestParams::new())
            .await
            .unwrap_err();
        let failure = err.api_failure().unwrap();
        assert_eq!(failure.numeric_code, Some(40103));
        assert_eq!(failure.request.path, "/admin/v1/users");
        assert_eq!(transport.sent().len(), 1);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn request_all_walks_offsets() {
        let transport = ScriptedTransport::with(vec![
            ok(json!([{"id": 1}, {"id": 2}])),
            ok(json!([{"id": 3}, {"id": 4}])),
            ok(json!([{"id": 5}])),
        ]);
        let params = RequestParams::new().with("username", "jdoe");
        let rows: Vec<Row> = service(transport.clone())
            .request_all(HttpMethod::Get, "/admin/v1/users", params, 2)
            .await
            .unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        let queries: Vec<_> = transport.sent().iter().map(|r| r.query.clone().unwrap_or_default()).collect();
        assert_eq!(queries, vec![
            "limit=2&offset=0&username=jdoe",
            "limit=2&offset=2&username=jdoe",
            "limit=2&offset=4&username=jdoe",
        ]);
    }

    #[tokio::test]
    async fn request_all_fails_without_partial_result() {
        let transport = ScriptedTransport::with(vec![
            ok(json!([{"id": 1}, {"id": 2}])),
            Reply::Json(200, json!({"stat": "FAIL", "code": 50000, "message": "Internal error"})),
        ]);
        let err = service(transport.clone())
            .request_all::<Row>(HttpMethod::Get, "/admin/v1/users", RequestParams::new(), 2)
            .await
            .unwrap_err();
        assert_eq!(err.api_failure().and_then(|f| f.numeric_code), Some(50000));
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn request_all_rejects_non_list_payload() {
        let transport = ScriptedTransport::with(vec![ok(json!({"id": 1})), ok(json!({"id": 1}))]);
        let err = service(transport)
            .request_all::<Row>(HttpMethod::Get, "/admin/v1/users", RequestParams::new(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn ping_is_unsigned() {
        let transport = ScriptedTransport::with(vec![ok(json!({"time": 1_893_456_000}))]);
        let payload = service(transport.clone()).ping().await.unwrap();
        assert_eq!(payload["time"], 1_893_456_000);

        let sent = transport.sent();
        assert!(!sent[0].is_signed());
        assert!(sent[0].header("X-Duo-Date").is_none());
        assert_eq!(sent[0].url(), "https://api-1234.example.com/auth/v2/ping");
    }

    #[tokio::test]
    async fn request_as_decodes_payload() {
        let transport = ScriptedTransport::with(vec![ok(json!({"id": 7}))]);
        let row: Row = service(transport)
            .request_as(HttpMethod::Get, "/admin/v1/users/DU7", RequestParams::new())
            .await
            .unwrap();
        assert_eq!(row, Row { id: 7 });
    }

    #[tokio::test]
    async fn config_sets_date_header() {
        let transport = ScriptedTransport::with(vec![ok(json!({}))]);
        let config = ClientConfig { date_header: "Date".into(), ..ClientConfig::default() };
        service(transport.clone())
            .with_config(&config)
            .request(HttpMethod::Get, "/auth/v2/check", RequestParams::new())
            .await
            .unwrap();
        assert!(transport.sent()[0].header("Date").is_some());
    }
}
