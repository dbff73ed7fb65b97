// src/crawler/mod.rs
// =============================================================================
// The public crawling API.
//
// Submodules:
// - orchestrator: GitHubCrawler (fetch_file, fetch_readme, fetch_multiple_files)
// - batch: BatchItem / BatchResult records
// - dispatch: {mode, url, path} requests routed onto the crawler
// =============================================================================

mod batch;
mod dispatch;
mod orchestrator;

pub use batch::{BatchItem, BatchResult};
pub use dispatch::{use_github_crawler, CrawlMode, CrawlRequest};
pub use orchestrator::{GitHubCrawler, BATCH_DELAY_MAX_MS, BATCH_DELAY_MIN_MS};
