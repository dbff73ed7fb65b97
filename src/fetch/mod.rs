// src/fetch/mod.rs
// =============================================================================
// HTTP fetching.
//
// Submodules:
// - options: FetchOptions (timeout, retries, backoff, token)
// - transport: the HttpTransport trait and its reqwest implementation
// - rate_limit: reads x-ratelimit-* headers
// - client: the Fetcher itself, with retry and backoff
// =============================================================================

mod client;
mod options;
mod rate_limit;
pub(crate) mod transport;

pub use client::{get_random_delay, sleep_ms, Fetcher};
pub use options::{
    FetchOptions, DEFAULT_BASE_RETRY_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use rate_limit::{RateLimitSnapshot, LOW_RATE_LIMIT_THRESHOLD};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
