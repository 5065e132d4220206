use std::time::Duration;

use async_trait::async_trait;
use duoadmin_core::{RawResponse, SignedRequest, Transport};
use duoadmin_domain::{AdminError, ClientConfig, HttpMethod, Result};
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;

use crate::errors::transport_failure;

/// reqwest-backed [`Transport`].
///
/// Sends exactly one exchange per call; retries belong to the service. The
/// caller-side timeout covers connect, send and reading the whole body.
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    timeout: Duration,
    base_url: Option<String>,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Build from the timeout and user agent in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn target_url(&self, request: &SignedRequest) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), request.path_and_query()),
            None => request.url(),
        }
    }

    async fn exchange(&self, request: &SignedRequest) -> std::result::Result<RawResponse, reqwest::Error> {
        let mut builder = self.client.request(to_reqwest(request.method), self.target_url(request));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse> {
        debug!(method = %request.method, path = %request.path, "sending HTTP request");

        match tokio::time::timeout(self.timeout, self.exchange(request)).await {
            Ok(Ok(raw)) => {
                debug!(
                    method = %request.method,
                    path = %request.path,
                    status = raw.status,
                    bytes = raw.body.len(),
                    "received HTTP response"
                );
                Ok(raw)
            }
            Ok(Err(err)) => {
                debug!(method = %request.method, path = %request.path, error = %err, "HTTP request failed");
                Err(transport_failure(&err, request.summary()))
            }
            Err(_) => {
                debug!(method = %request.method, path = %request.path, "HTTP request timed out");
                Err(AdminError::Transport {
                    request: request.summary(),
                    message: format!(
                        "no response within {} ms; outcome unknown",
                        self.timeout.as_millis()
                    ),
                })
            }
        }
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    base_url: Option<String>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), user_agent: None, base_url: None }
    }
}

impl HttpTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Send to `url` + path instead of `https://{api host}` + path.
    ///
    /// The signature still covers the configured API host; this is for
    /// local test servers and forwarding proxies.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|err| AdminError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpTransport { client, timeout: self.timeout, base_url: self.base_url })
    }
}
