// src/crawler/dispatch.rs
// =============================================================================
// A single entry point taking {mode, url, path?}, for callers that receive
// requests as data (JSON from another tool, for instance) rather than
// calling fetch_file / fetch_readme directly.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::orchestrator::GitHubCrawler;
use crate::error::{CrawlerError, Result};
use crate::fetch::FetchOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    FetchFile,
    FetchReadme,
}

impl FromStr for CrawlMode {
    type Err = CrawlerError;

    fn from_str(mode: &str) -> Result<Self> {
        match mode {
            "fetch_file" => Ok(CrawlMode::FetchFile),
            "fetch_readme" => Ok(CrawlMode::FetchReadme),
            other => Err(CrawlerError::UnknownMode(other.to_string())),
        }
    }
}

/// `{"mode": "fetch_file" | "fetch_readme", "url": ..., "path": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub mode: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl GitHubCrawler {
    /// Routes a request to fetch_file or fetch_readme.
    pub async fn dispatch(&mut self, request: &CrawlRequest) -> Result<String> {
        match request.mode.parse::<CrawlMode>()? {
            CrawlMode::FetchFile => self.fetch_file(&request.url, request.path.as_deref()).await,
            CrawlMode::FetchReadme => self.fetch_readme(&request.url).await,
        }
    }
}

/// Builds a crawler with default options and runs one request on it.
pub async fn use_github_crawler(request: &CrawlRequest) -> Result<String> {
    request.mode.parse::<CrawlMode>()?;
    let mut crawler = GitHubCrawler::new(FetchOptions::default())?;
    crawler.dispatch(request).await
}
