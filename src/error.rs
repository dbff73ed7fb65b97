// src/error.rs
// =============================================================================
// The error type shared by every part of the crawler.
//
// Errors fall into three groups:
// - Input errors (bad URL, missing path, unknown mode): never retried
// - Transport errors (network, 5xx, 429): retried inside the fetcher
// - Page errors (not found, private, nothing to extract): detected by the parser
//
// The crawler wraps whatever went wrong in FileFetch / ReadmeFetch so the
// message a caller sees always says which operation failed.
// =============================================================================

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, CrawlerError>;

#[derive(Debug, Error)]
pub enum CrawlerError {
    /// The string is not one of the accepted GitHub URL shapes.
    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),

    /// HTTP 404. Never retried by the fetcher.
    #[error("Not found: {url}")]
    NotFound { url: String },

    /// HTTP 429. Only seen inside the retry loop.
    #[error("Rate limited: {url}")]
    RateLimited { url: String },

    /// Network failure or timeout.
    #[error("{0}")]
    Transport(String),

    /// Any other non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Every attempt failed; carries the last failure's message.
    #[error("Failed after {attempts} attempts: {message}")]
    FetchExhausted { attempts: u32, message: String },

    #[error("{0}")]
    Extraction(String),

    #[error("HTML not loaded. Call load() first.")]
    NotLoaded,

    #[error("Repository is private. Please provide a GitHub token.")]
    PrivateRepo,

    #[error("Repository not found: {owner}/{repo}")]
    RepoNotFound { owner: String, repo: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// An error banner found on the page itself.
    #[error("Error: {0}")]
    PageError(String),

    #[error("File path is required. Either provide it in the URL or as a parameter.")]
    MissingPath,

    #[error("README not found in the repository")]
    EmptyReadme,

    #[error("Unknown mode: {0}. Valid modes are: fetch_readme, fetch_file")]
    UnknownMode(String),

    #[error("Failed to fetch file: {0}")]
    FileFetch(#[source] Box<CrawlerError>),

    #[error("Failed to fetch README: {0}")]
    ReadmeFetch(#[source] Box<CrawlerError>),
}

impl CrawlerError {
    /// Peels off FileFetch / ReadmeFetch wrappers and returns the underlying cause.
    pub fn root(&self) -> &CrawlerError {
        match self {
            CrawlerError::FileFetch(inner) | CrawlerError::ReadmeFetch(inner) => inner.root(),
            other => other,
        }
    }

    /// Whether the fetcher should try this request again.
    pub(crate) fn is_retryable(&self) -> bool {
        matches!(
            self,
            CrawlerError::RateLimited { .. }
                | CrawlerError::Transport(_)
                | CrawlerError::HttpStatus { .. }
        )
    }
}
