//! Fetch files and READMEs from GitHub repositories.
//!
//! Files are read from `raw.githubusercontent.com` first; when that fails the
//! crawler scrapes the file's github.com page instead. READMEs are scraped
//! from the repository home page. Requests retry with linear backoff and log
//! a warning when GitHub's rate limit runs low.
//!
//! ```no_run
//! use github_crawler::{FetchOptions, GitHubCrawler};
//!
//! # async fn demo() -> github_crawler::Result<()> {
//! let mut crawler = GitHubCrawler::new(FetchOptions::default())?;
//! let readme = crawler.fetch_readme("https://github.com/rust-lang/rust").await?;
//! let file = crawler
//!     .fetch_file("https://github.com/rust-lang/rust/blob/main/Cargo.toml", None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod crawler;
pub mod error;
pub mod fetch;
pub mod github;
pub mod parser;

pub use crawler::{
    use_github_crawler, BatchItem, BatchResult, CrawlMode, CrawlRequest, GitHubCrawler,
};
pub use error::{CrawlerError, Result};
pub use fetch::{get_random_delay, FetchOptions, Fetcher, RateLimitSnapshot};
pub use github::{
    build_file_url, build_raw_url, build_readme_url, is_valid_github_url, parse_github_url,
    RepoRef,
};
pub use parser::GitHubParser;
