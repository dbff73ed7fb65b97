// src/crawler/orchestrator.rs
// =============================================================================
// GitHubCrawler ties the resolver, fetcher and parser together.
//
// fetch_file tries two strategies, each exactly once:
// 1. raw.githubusercontent.com on branch "main" (fast, plain text)
// 2. the github.com blob page, scraped with GitHubParser
// Strategy 2 runs whenever strategy 1 fails for any reason. This is also what
// rescues repositories whose default branch is not "main".
//
// fetch_readme scrapes the repository home page.
//
// Everything is sequential. The crawler owns a single parser whose document
// is overwritten by each load(), and &mut self keeps two fetches from ever
// sharing it.
// =============================================================================

use tracing::{info, warn};

use super::batch::{BatchItem, BatchResult};
use crate::error::{CrawlerError, Result};
use crate::fetch::{get_random_delay, sleep_ms, FetchOptions, Fetcher, HttpTransport};
use crate::github::{build_file_url, build_raw_url, build_readme_url, parse_github_url, RepoRef};
use crate::parser::GitHubParser;

/// Jitter bounds for the pause between batch items, in milliseconds.
pub const BATCH_DELAY_MIN_MS: u64 = 500;
pub const BATCH_DELAY_MAX_MS: u64 = 1500;

// A raw response containing any of these is treated as a missing file
const RAW_NOT_FOUND_MARKERS: &[&str] = &["404: Not Found", "Not Found"];

pub struct GitHubCrawler {
    fetcher: Fetcher,
    parser: GitHubParser,
}

impl GitHubCrawler {
    pub fn new(options: FetchOptions) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(options)?,
            parser: GitHubParser::new(),
        })
    }

    pub fn with_transport(options: FetchOptions, transport: Box<dyn HttpTransport>) -> Self {
        Self {
            fetcher: Fetcher::with_transport(options, transport),
            parser: GitHubParser::new(),
        }
    }

    /// Token used for all later requests (private repositories, higher limits).
    pub fn set_token(&mut self, token: &str) {
        self.fetcher.set_token(token);
    }

    /// Fetches the README shown on a repository's home page.
    pub async fn fetch_readme(&mut self, url: &str) -> Result<String> {
        self.try_fetch_readme(url)
            .await
            .map_err(|e| CrawlerError::ReadmeFetch(Box::new(e)))
    }

    async fn try_fetch_readme(&mut self, url: &str) -> Result<String> {
        let repo = parse_github_url(url)?;
        info!("Fetching README from {}/{}...", repo.owner, repo.repo);

        let html = self.fetcher.fetch(&build_readme_url(&repo.owner, &repo.repo)).await?;
        self.parser.load(&html);

        self.check_page_state(CrawlerError::RepoNotFound {
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
        })?;

        let readme = self.parser.extract_readme_content()?;
        if readme.is_empty() {
            return Err(CrawlerError::EmptyReadme);
        }

        info!("Successfully fetched README ({} characters)", readme.chars().count());
        Ok(readme)
    }

    /// Fetches one file. `path` is used only when the URL itself has no path.
    pub async fn fetch_file(&mut self, url: &str, path: Option<&str>) -> Result<String> {
        self.try_fetch_file(url, path)
            .await
            .map_err(|e| CrawlerError::FileFetch(Box::new(e)))
    }

    async fn try_fetch_file(&mut self, url: &str, path: Option<&str>) -> Result<String> {
        let repo = parse_github_url(url)?;

        let file_path = match (repo.path.as_deref(), path) {
            (Some(embedded), _) => embedded.to_string(),
            (None, Some(given)) if !given.is_empty() => given.to_string(),
            _ => return Err(CrawlerError::MissingPath),
        };

        info!("Fetching file: {}/{}/{}...", repo.owner, repo.repo, file_path);

        let content = match self.fetch_raw(&repo, &file_path).await {
            Ok(content) => content,
            Err(raw_error) => {
                warn!("Raw fetch failed ({}), trying web scraping...", raw_error);
                self.scrape_file(&repo, &file_path).await?
            }
        };

        info!("Successfully fetched file ({} characters)", content.chars().count());
        Ok(content)
    }

    async fn fetch_raw(&self, repo: &RepoRef, file_path: &str) -> Result<String> {
        let raw_url = build_raw_url(&repo.owner, &repo.repo, file_path, None);
        let content = self.fetcher.fetch_raw_content(&raw_url).await?;

        if content.is_empty() || RAW_NOT_FOUND_MARKERS.iter().any(|m| content.contains(m)) {
            return Err(CrawlerError::FileNotFound { path: file_path.to_string() });
        }

        Ok(content)
    }

    async fn scrape_file(&mut self, repo: &RepoRef, file_path: &str) -> Result<String> {
        let file_url = build_file_url(&repo.owner, &repo.repo, file_path, None);
        let html = self.fetcher.fetch(&file_url).await?;
        self.parser.load(&html);

        self.check_page_state(CrawlerError::FileNotFound { path: file_path.to_string() })?;

        let content = self.parser.extract_file_content()?;
        if content.is_empty() {
            return Err(CrawlerError::Extraction("Could not extract file content".to_string()));
        }
        Ok(content)
    }

    // Not found, then private, then error banner. `not_found` is the error to
    // report for the first case.
    fn check_page_state(&self, not_found: CrawlerError) -> Result<()> {
        if self.parser.is_not_found() {
            return Err(not_found);
        }
        if self.parser.is_private() {
            return Err(CrawlerError::PrivateRepo);
        }
        if let Some(message) = self.parser.extract_error() {
            return Err(CrawlerError::PageError(message));
        }
        Ok(())
    }

    /// Fetches each item in turn with a random pause between them. Failures
    /// are recorded per item; results come back in input order.
    pub async fn fetch_multiple_files(&mut self, items: &[BatchItem]) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let result = match self.fetch_file(&item.url, item.path.as_deref()).await {
                Ok(content) => BatchResult::succeeded(item.label(), content),
                Err(e) => {
                    warn!("Batch item {} failed: {}", item.label(), e);
                    BatchResult::failed(item.label(), e.to_string())
                }
            };
            results.push(result);

            if index + 1 < items.len() {
                sleep_ms(get_random_delay(BATCH_DELAY_MIN_MS, BATCH_DELAY_MAX_MS)).await;
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::transport::{MockReply, MockTransport};
    use std::time::Duration;

    const FILE_URL: &str = "https://github.com/o/r/blob/main/docs/guide.md";
    const RAW_URL: &str = "https://raw.githubusercontent.com/o/r/main/docs/guide.md";
    const BLOB_URL: &str = "https://github.com/o/r/blob/main/docs/guide.md";
    const HOME_URL: &str = "https://github.com/o/r";

    // Matches the not-found, private and error-banner checks all at once
    const NOT_FOUND_AND_PRIVATE_PAGE: &str = r#"<html><body>
        <h1>Repository not found</h1>
        <p>This may be a private repository.</p>
        <div class="flash-error">Access denied</div>
        <article class="markdown-body"><h1>Hidden</h1></article>
        <pre>hidden</pre>
    </body></html>"#;

    fn crawler(mock: &MockTransport) -> GitHubCrawler {
        let options = FetchOptions::default()
            .with_max_retries(3)
            .with_base_retry_delay(Duration::from_millis(10));
        GitHubCrawler::with_transport(options, Box::new(mock.clone()))
    }

    fn blob_page(content: &str) -> String {
        format!(
            r#"<html><head><title>guide.md at main · o/r</title></head>
            <body><div data-testid="raw-content">{}</div></body></html>"#,
            content
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_success_skips_scraping() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::ok("# Guide\n"));

        let content = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap();
        assert_eq!(content, "# Guide\n");
        assert_eq!(mock.count(BLOB_URL), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_404_falls_back_to_scrape_once() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::status(404, "404: Not Found"));
        mock.push(BLOB_URL, MockReply::ok(&blob_page("scraped guide")));

        let content = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap();
        assert_eq!(content, "scraped guide");
        assert_eq!(mock.count(RAW_URL), 1);
        assert_eq!(mock.count(BLOB_URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_retries_then_succeeds_without_scraping() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::Fail("connection reset".to_string()));
        mock.push(RAW_URL, MockReply::Fail("connection reset".to_string()));
        mock.push(RAW_URL, MockReply::ok("third time lucky"));

        let content = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap();
        assert_eq!(content, "third time lucky");
        assert_eq!(mock.count(RAW_URL), 3);
        assert_eq!(mock.count(BLOB_URL), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_not_found_body_triggers_scrape() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::ok("404: Not Found"));
        mock.push(BLOB_URL, MockReply::ok(&blob_page("real content")));

        let content = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap();
        assert_eq!(content, "real content");
    }

    #[tokio::test(start_paused = true)]
    async fn test_path_parameter_used_for_repo_url() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::ok("from param"));

        let content = crawler(&mock)
            .fetch_file(HOME_URL, Some("docs/guide.md"))
            .await
            .unwrap();
        assert_eq!(content, "from param");
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_path() {
        let mock = MockTransport::new();

        let err = crawler(&mock).fetch_file(HOME_URL, None).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::MissingPath));
        assert!(err.to_string().starts_with("Failed to fetch file: File path is required"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_url() {
        let mock = MockTransport::new();

        let err = crawler(&mock).fetch_file("https://gitlab.com/o/r", None).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::InvalidUrl(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_strategies_fail_reports_scrape_error() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::status(404, ""));
        mock.push(
            BLOB_URL,
            MockReply::ok(
                "<html><head><title>Page not found · GitHub</title></head><body></body></html>",
            ),
        );

        let err = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::FileNotFound { .. }));
        assert_eq!(err.to_string(), "Failed to fetch file: File not found: docs/guide.md");
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrape_private_repo() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::status(404, ""));
        mock.push(
            BLOB_URL,
            MockReply::ok(
                "<html><body><p>This is a private repository.</p><pre>x</pre></body></html>",
            ),
        );

        let err = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::PrivateRepo));
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_server_errors_exhaust_then_scrape_once() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::status(503, "unavailable"));
        mock.push(BLOB_URL, MockReply::ok(&blob_page("served by scrape")));

        let content = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap();
        assert_eq!(content, "served by scrape");
        assert_eq!(mock.count(RAW_URL), 3);
        assert_eq!(mock.count(BLOB_URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrape_not_found_checked_before_private() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::status(404, ""));
        mock.push(BLOB_URL, MockReply::ok(NOT_FOUND_AND_PRIVATE_PAGE));

        let err = crawler(&mock).fetch_file(FILE_URL, None).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::FileNotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_readme_not_found_checked_before_private() {
        let mock = MockTransport::new();
        mock.push(HOME_URL, MockReply::ok(NOT_FOUND_AND_PRIVATE_PAGE));

        let err = crawler(&mock).fetch_readme(HOME_URL).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::RepoNotFound { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_readme_success() {
        let mock = MockTransport::new();
        mock.push(
            HOME_URL,
            MockReply::ok(
                r#"<html><head><title>o/r</title></head><body>
                <article class="markdown-body"><h1>Project</h1><button>Copy</button></article>
                </body></html>"#,
            ),
        );

        let readme = crawler(&mock)
            .fetch_readme("https://github.com/o/r/tree/main/src")
            .await
            .unwrap();
        assert_eq!(readme, "Project");
        assert_eq!(mock.count(HOME_URL), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_readme_repo_not_found_stops_before_extraction() {
        let mock = MockTransport::new();
        mock.push(
            HOME_URL,
            MockReply::ok(
                r#"<html><body><h2>Repository not found</h2>
                <article class="markdown-body"><h1>Would be extracted</h1></article>
                </body></html>"#,
            ),
        );

        let err = crawler(&mock).fetch_readme(HOME_URL).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::RepoNotFound { .. }));
        assert_eq!(err.to_string(), "Failed to fetch README: Repository not found: o/r");
    }

    #[tokio::test(start_paused = true)]
    async fn test_readme_error_banner() {
        let mock = MockTransport::new();
        mock.push(
            HOME_URL,
            MockReply::ok(
                r#"<html><body><div class="flash-error">Rate limit hit</div></body></html>"#,
            ),
        );

        let err = crawler(&mock).fetch_readme(HOME_URL).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch README: Error: Rate limit hit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_readme_empty() {
        let mock = MockTransport::new();
        mock.push(
            HOME_URL,
            MockReply::ok(r#"<html><body><article data-testid="readme"> </article></body></html>"#),
        );

        let err = crawler(&mock).fetch_readme(HOME_URL).await.unwrap_err();
        assert!(matches!(err.root(), CrawlerError::EmptyReadme));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_token_reaches_requests() {
        let mock = MockTransport::new();
        mock.push(RAW_URL, MockReply::ok("x"));

        let mut crawler = crawler(&mock);
        crawler.set_token("secret");
        crawler.fetch_file(FILE_URL, None).await.unwrap();

        let request = &mock.requests()[0];
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "token secret".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_keeps_order_and_records_failures() {
        let a_raw = "https://raw.githubusercontent.com/o/r/main/a.md";
        let c_raw = "https://raw.githubusercontent.com/o/r/main/c.md";

        let mock = MockTransport::new();
        mock.push(a_raw, MockReply::ok("A"));
        mock.push(c_raw, MockReply::ok("C"));

        let items = vec![
            BatchItem::new("https://github.com/o/r/blob/main/a.md"),
            BatchItem { url: HOME_URL.to_string(), path: None },
            BatchItem::with_path(HOME_URL, "c.md"),
        ];

        let results = crawler(&mock).fetch_multiple_files(&items).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert_eq!(results[0].content.as_deref(), Some("A"));
        assert_eq!(results[0].path, "https://github.com/o/r/blob/main/a.md");

        assert!(!results[1].success);
        assert!(results[1].error.as_deref().unwrap().contains("path is required"));

        assert!(results[2].success);
        assert_eq!(results[2].path, "c.md");

        // Two jittered pauses sit between the first and last request
        let first = mock.request_times(a_raw)[0];
        let last = mock.request_times(c_raw)[0];
        let gap = last - first;
        assert!(gap >= Duration::from_millis(2 * BATCH_DELAY_MIN_MS));
        assert!(gap <= Duration::from_millis(2 * BATCH_DELAY_MAX_MS + 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_no_delay_after_last_item() {
        let mock = MockTransport::new();
        mock.push("https://raw.githubusercontent.com/o/r/main/a.md", MockReply::ok("A"));

        let start = tokio::time::Instant::now();
        let results = crawler(&mock)
            .fetch_multiple_files(&[BatchItem::new("https://github.com/o/r/blob/main/a.md")])
            .await;
        assert!(results[0].success);
        assert!(start.elapsed() < Duration::from_millis(BATCH_DELAY_MIN_MS));
    }
}
