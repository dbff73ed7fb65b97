// src/fetch/rate_limit.rs
// =============================================================================
// Reads GitHub's x-ratelimit-* headers off a response.
//
// The snapshot is only used to warn when the remaining budget gets low; the
// fetcher never waits on it.
// =============================================================================

use chrono::{DateTime, Utc};

use super::transport::HttpResponse;

/// Below this many remaining requests the fetcher logs a warning.
pub const LOW_RATE_LIMIT_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub limit: u64,
    pub remaining: u64,
    pub reset_epoch_seconds: i64,
    pub used: Option<u64>,
}

impl RateLimitSnapshot {
    // Returns None unless limit, remaining and reset are all present and numeric
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        let number = |name: &str| response.header(name)?.trim().parse::<u64>().ok();

        Some(Self {
            limit: number("x-ratelimit-limit")?,
            remaining: number("x-ratelimit-remaining")?,
            reset_epoch_seconds: response.header("x-ratelimit-reset")?.trim().parse::<i64>().ok()?,
            used: number("x-ratelimit-used"),
        })
    }

    pub fn is_low(&self) -> bool {
        self.remaining < LOW_RATE_LIMIT_THRESHOLD
    }

    /// Whole minutes from `now` until the limit resets, rounded up, never negative.
    pub fn minutes_until_reset(&self, now: DateTime<Utc>) -> i64 {
        let Some(reset_at) = DateTime::from_timestamp(self.reset_epoch_seconds, 0) else {
            return 0;
        };
        let seconds = (reset_at - now).num_seconds().max(0);
        (seconds + 59) / 60
    }
}
