// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Global flags configure the fetcher (token, timeout, retries); each
// subcommand maps onto one crawler operation.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use github_crawler::fetch::{FetchOptions, DEFAULT_MAX_RETRIES};

#[derive(Parser, Debug)]
#[command(
    name = "github-crawler",
    version,
    about = "Fetch files and READMEs from GitHub repositories",
    long_about = "github-crawler downloads files and READMEs from GitHub. It reads \
                  raw.githubusercontent.com first and falls back to scraping the \
                  github.com page, retrying on rate limits and transient errors."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub personal access token (private repositories, higher rate limits)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Timeout for each HTTP request, in milliseconds
    #[arg(long, global = true, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Attempts per request before giving up
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Base delay between attempts, in milliseconds
    #[arg(long, global = true, default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Log debug output (retries, matched selectors)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single file
    ///
    /// Example: github-crawler file https://github.com/owner/repo/blob/main/README.md
    File {
        /// Blob or tree URL, or a repository URL together with --path
        url: String,

        /// Path inside the repository, used when the URL has none
        #[arg(long)]
        path: Option<String>,

        /// Write the content here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the README rendered on a repository's home page
    ///
    /// Example: github-crawler readme https://github.com/owner/repo -o README.txt
    Readme {
        /// Repository URL
        url: String,

        /// Write the content here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch every file listed in a JSON manifest, one after another
    ///
    /// The manifest is an array of {"url": ..., "path": ...} objects.
    Batch {
        /// Path to the manifest file
        manifest: PathBuf,

        /// Directory the fetched files are saved under
        #[arg(long, default_value = "crawled")]
        out_dir: PathBuf,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run a {"mode": ..., "url": ..., "path": ...} request and print the content
    Request {
        /// The request as a JSON object
        request: String,
    },
}

impl Cli {
    pub fn fetch_options(&self) -> FetchOptions {
        let mut options = FetchOptions::default()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_max_retries(self.max_retries)
            .with_base_retry_delay(Duration::from_millis(self.retry_delay_ms));

        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            options = options.with_auth_token(token);
        }
        options
    }
}


// -----------------------------------------------------------------------------
// NOTES:
//
// 1. global = true
//    - Lets a flag appear before or after the subcommand name
//    - `github-crawler --token X file URL` and `github-crawler file URL --token X`
//      both work
//
// 2. env = "GITHUB_TOKEN"
//    - clap reads the variable when the flag is absent (needs the "env" feature)
//    - hide_env_values keeps the token out of --help output
// -----------------------------------------------------------------------------
