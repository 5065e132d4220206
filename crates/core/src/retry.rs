use std::time::Duration;

use duoadmin_domain::{AdminError, HttpMethod, RetryConfig};

/// When and how long to wait before re-issuing a request.
///
/// Only transport failures on idempotent methods are retried, plus a single
/// retry of a malformed response to an idempotent method. A retried request
/// is re-signed with a fresh timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    /// One attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether a failure on attempt `attempt` (1-based) should be retried.
    pub fn should_retry(&self, err: &AdminError, method: HttpMethod, attempt: u32) -> bool {
        if attempt >= self.max_attempts || !err.is_retryable(method) {
            return false;
        }
        match err {
            AdminError::MalformedResponse { .. } => attempt == 1,
            _ => true,
        }
    }

    /// Delay before retry number `retry_number` (1-based), doubling each time.
    pub fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    pub(crate) async fn wait(&self, retry_number: u32) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.base_backoff_ms))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use duoadmin_domain::{ApiFailure, RequestSummary};

    use super::*;

    fn request() -> RequestSummary {
        RequestSummary::new("GET", "/admin/v1/users", BTreeMap::new())
    }

    fn transport() -> AdminError {
        AdminError::Transport { request: request(), message: "timed out".into() }
    }

    fn malformed() -> AdminError {
        AdminError::MalformedResponse { request: request(), detail: "not json".into() }
    }

    #[test]
    fn transport_failures_retry_only_idempotent_methods() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        assert!(policy.should_retry(&transport(), HttpMethod::Get, 1));
        assert!(policy.should_retry(&transport(), HttpMethod::Delete, 2));
        assert!(!policy.should_retry(&transport(), HttpMethod::Get, 3));
        assert!(!policy.should_retry(&transport(), HttpMethod::Post, 1));
        assert!(!policy.should_retry(&transport(), HttpMethod::Put, 1));
    }

    #[test]
    fn malformed_responses_retry_once() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        assert!(policy.should_retry(&malformed(), HttpMethod::Get, 1));
        assert!(!policy.should_retry(&malformed(), HttpMethod::Get, 2));
        assert!(!policy.should_retry(&malformed(), HttpMethod::Post, 1));
    }

    #[test]
    fn remote_failures_are_not_retried() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let api = AdminError::Api(ApiFailure {
            code: "FAIL".into(),
            numeric_code: Some(42901),
            message: Some("Too Many Requests".into()),
            detail: None,
            http_status: Some(429),
            request: request(),
        });
        assert!(!policy.should_retry(&api, HttpMethod::Get, 1));
        assert!(!policy.should_retry(&AdminError::NotConfigured, HttpMethod::Get, 1));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_delay(20), Duration::from_millis(25_600));
    }

    #[test]
    fn built_from_config() {
        let policy = RetryPolicy::from(RetryConfig { max_attempts: 0, base_backoff_ms: 50 });
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(50));
    }
}
