// src/fetch/options.rs
// =============================================================================
// Settings for a Fetcher. They are fixed when the fetcher is built, except
// for the token which can be set later with Fetcher::set_token.
// =============================================================================

use std::time::Duration;

/// A desktop browser User-Agent. github.com serves the full page markup to it.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Upper bound on a single HTTP request.
    pub timeout: Duration,
    /// Total attempts per request, the first one included.
    pub max_retries: u32,
    /// Unit for the linear backoff between attempts.
    pub base_retry_delay: Duration,
    /// Sent as `Authorization: token ...` when present.
    pub auth_token: Option<String>,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            base_retry_delay: DEFAULT_BASE_RETRY_DELAY,
            auth_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_retry_delay(mut self, delay: Duration) -> Self {
        self.base_retry_delay = delay;
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.base_retry_delay, Duration::from_millis(1000));
        assert!(options.auth_token.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let options = FetchOptions::default()
            .with_max_retries(5)
            .with_base_retry_delay(Duration::from_millis(10))
            .with_auth_token("abc");
        assert_eq!(options.max_retries, 5);
        assert_eq!(options.base_retry_delay, Duration::from_millis(10));
        assert_eq!(options.auth_token.as_deref(), Some("abc"));
    }
}
