//! Blocking HTTP client for PostHog-compatible capture endpoints

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use super::event::{CaptureEvent, EventSink};
use crate::config::BenchConfig;
use crate::utils::ClientError;

/// Path of the single-event capture route
const CAPTURE_PATH: &str = "capture/";

/// Request body: the event plus the project key
#[derive(Serialize)]
struct CaptureRequest<'a> {
    api_key: &'a str,
    #[serde(flatten)]
    event: &'a CaptureEvent,
}

/// HTTP capture client
///
/// Wraps a pooled `reqwest` blocking client, which is safe to share
/// between worker threads. Submissions are never retried.
pub struct HttpCaptureClient {
    inner: Client,
    capture_url: Url,
    api_key: String,
}

impl HttpCaptureClient {
    /// Create a new client for `endpoint`
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        let capture_url = capture_url(endpoint)?;

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("capture-bench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        debug!(url = %capture_url, "Capture client ready");

        Ok(Self {
            inner,
            capture_url,
            api_key: api_key.to_string(),
        })
    }

    /// Create a client from benchmark configuration
    pub fn from_config(config: &BenchConfig) -> crate::utils::Result<Self> {
        Ok(Self::new(
            &config.endpoint,
            &config.api_key,
            config.request_timeout,
        )?)
    }

    /// Full URL events are posted to
    pub fn capture_url(&self) -> &Url {
        &self.capture_url
    }
}

impl EventSink for HttpCaptureClient {
    fn submit(&self, event: &CaptureEvent) -> Result<(), ClientError> {
        let body = CaptureRequest {
            api_key: &self.api_key,
            event,
        };

        let response = self
            .inner
            .post(self.capture_url.clone())
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Resolve `<endpoint>/capture/`, rejecting anything that is not http(s)
fn capture_url(endpoint: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let base = format!("{}/", endpoint.trim_end_matches('/'));
    let base = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;

    match base.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }

    base.join(CAPTURE_PATH).map_err(|e| invalid(e.to_string()))
}
