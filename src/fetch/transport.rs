// src/fetch/transport.rs
// =============================================================================
// The boundary between the fetcher and the network.
//
// The fetcher only ever talks to an HttpTransport. In production that is
// ReqwestTransport; in tests it is MockTransport, which replays canned
// responses so retry and fallback behaviour can be checked without sockets.
// =============================================================================

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{CrawlerError, Result};

/// A GET request as the fetcher builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First header value matching `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends one request. Non-2xx statuses are returned as responses, only
/// failures to get any response at all are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// HttpTransport backed by a reqwest Client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| CrawlerError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(categorize_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = response.text().await.map_err(categorize_error)?;

        Ok(HttpResponse { status, headers, body })
    }
}

// Turns a reqwest error into a short, readable message
fn categorize_error(error: reqwest::Error) -> CrawlerError {
    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };
    CrawlerError::Transport(message)
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
pub(crate) use mock::{MockReply, MockTransport};
