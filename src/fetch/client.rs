// src/fetch/client.rs
// =============================================================================
// GET requests with a timeout, retries and rate limit warnings.
//
// Retry policy (attempt counts from 1, max_retries attempts in total):
// - 404       -> fail right away with NotFound, no retry
// - 429       -> wait base_retry_delay * attempt * 2, then try again
// - other     -> wait base_retry_delay * attempt, then try again
// - exhausted -> FetchExhausted carrying the last error's message
//
// A 429 uses up an attempt just like any other failure.
// =============================================================================

use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

use super::options::FetchOptions;
use super::rate_limit::RateLimitSnapshot;
use super::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::error::{CrawlerError, Result};

pub struct Fetcher {
    transport: Box<dyn HttpTransport>,
    options: FetchOptions,
    headers: Vec<(String, String)>,
}

impl Fetcher {
    /// Builds a fetcher that talks to the network through reqwest.
    pub fn new(options: FetchOptions) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(options.timeout)?;
        Ok(Self::with_transport(options, Box::new(transport)))
    }

    pub fn with_transport(options: FetchOptions, transport: Box<dyn HttpTransport>) -> Self {
        let mut headers = vec![
            ("User-Agent".to_string(), options.user_agent.clone()),
            (
                "Accept".to_string(),
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            ),
            ("Accept-Language".to_string(), "en-US,en;q=0.9".to_string()),
        ];
        if let Some(token) = &options.auth_token {
            headers.push(authorization(token));
        }

        Self { transport, options, headers }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Sets or replaces the token sent with every later request.
    pub fn set_token(&mut self, token: &str) {
        self.headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("Authorization"));
        self.headers.push(authorization(token));
        self.options.auth_token = Some(token.to_string());
    }

    /// Fetches `url` and returns the response body.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let max_attempts = self.options.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let err = match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            let delay = match err {
                CrawlerError::RateLimited { .. } => self.options.base_retry_delay * attempt * 2,
                _ => self.options.base_retry_delay * attempt,
            };

            if attempt < max_attempts {
                debug!(
                    "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                    attempt, max_attempts, url, err, delay
                );
                tokio::time::sleep(delay).await;
            } else {
                debug!("Attempt {}/{} for {} failed ({})", attempt, max_attempts, url, err);
            }
            last_error = Some(err);
        }

        Err(CrawlerError::FetchExhausted {
            attempts: max_attempts,
            message: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    /// Same as `fetch`, used for raw.githubusercontent.com URLs.
    pub async fn fetch_raw_content(&self, url: &str) -> Result<String> {
        self.fetch(url).await
    }

    // One request, no retries. Maps status codes onto errors.
    async fn fetch_once(&self, url: &str) -> Result<String> {
        let request = HttpRequest {
            url: url.to_string(),
            headers: self.headers.clone(),
        };

        let response = self.transport.send(request).await?;

        match response.status {
            404 => {
                return Err(CrawlerError::NotFound { url: url.to_string() });
            }
            429 => {
                return Err(CrawlerError::RateLimited { url: url.to_string() });
            }
            status if !(200..300).contains(&status) => {
                return Err(CrawlerError::HttpStatus { status, url: url.to_string() });
            }
            _ => {}
        }

        if let Some(snapshot) = RateLimitSnapshot::from_response(&response) {
            if snapshot.is_low() {
                warn!(
                    "GitHub rate limit low: {}/{} requests remaining, resets in {} minutes",
                    snapshot.remaining,
                    snapshot.limit,
                    snapshot.minutes_until_reset(chrono::Utc::now())
                );
            }
        }

        Ok(response.body)
    }
}

/// Random delay in milliseconds, `min..=max`. Used between batch items.
pub fn get_random_delay(min: u64, max: u64) -> u64 {
    if min >= max {
        return min;
    }
    rand::thread_rng().gen_range(min..=max)
}

pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn authorization(token: &str) -> (String, String) {
    ("Authorization".to_string(), format!("token {}", token))
}
