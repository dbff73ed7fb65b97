// src/github/repo_url.rs
// =============================================================================
// Turns GitHub web URLs into (owner, repo, path) and builds the URLs the
// crawler fetches from.
//
// Accepted shapes:
//   https://github.com/{owner}/{repo}
//   https://github.com/{owner}/{repo}/blob/{branch}/{path...}
//   https://github.com/{owner}/{repo}/tree/{branch}/{path...}
//
// The branch segment is matched but thrown away. Every URL we build uses
// "main", so repositories on another default branch 404 on the raw endpoint
// and are served by the HTML fallback instead (github.com resolves the real
// branch when it renders the page).
// =============================================================================

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::error::{CrawlerError, Result};

/// Branch used when building raw and blob URLs.
pub const DEFAULT_BRANCH: &str = "main";

// Escaped inside a single path segment; '/' separates segments and stays as is
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A repository, and optionally a path inside it, taken from a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    /// Path inside the repository, `None` for a repository root URL.
    pub path: Option<String>,
}

// Parses a GitHub URL into a RepoRef
//
// Returns: InvalidUrl if the string is not one of the three shapes above
//
// Example:
//   "https://github.com/rust-lang/rust/blob/main/README.md"
//     -> RepoRef { owner: "rust-lang", repo: "rust", path: Some("README.md") }
pub fn parse_github_url(url: &str) -> Result<RepoRef> {
    let invalid = || CrawlerError::InvalidUrl(url.to_string());

    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str() != Some("github.com") {
        return Err(invalid());
    }

    let mut segments: Vec<&str> = parsed.path_segments().ok_or_else(invalid)?.collect();

    // A single trailing slash on the repository root is allowed
    if segments.len() == 3 && segments[2].is_empty() {
        segments.pop();
    }

    if segments.len() < 2 || segments[0].is_empty() || segments[1].is_empty() {
        return Err(invalid());
    }

    let decode = |segment: &str| -> Result<String> {
        percent_decode_str(segment)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .map_err(|_| invalid())
    };

    let owner = decode(segments[0])?;
    let repo = decode(segments[1])?;

    if segments.len() == 2 {
        return Ok(RepoRef { owner, repo, path: None });
    }

    // blob/{branch}/{path...} or tree/{branch}/{path...}
    let is_view = matches!(segments[2], "blob" | "tree");
    if !is_view || segments.len() < 5 || segments[3].is_empty() {
        return Err(invalid());
    }

    let path = segments[4..]
        .iter()
        .map(|segment| decode(segment))
        .collect::<Result<Vec<_>>>()?
        .join("/");
    if path.is_empty() {
        return Err(invalid());
    }

    Ok(RepoRef { owner, repo, path: Some(path) })
}

/// Returns true if `url` is one of the accepted GitHub URL shapes.
pub fn is_valid_github_url(url: &str) -> bool {
    parse_github_url(url).is_ok()
}

/// Blob view of a file: `https://github.com/{owner}/{repo}/blob/{branch}/{path}`.
pub fn build_file_url(owner: &str, repo: &str, path: &str, branch: Option<&str>) -> String {
    format!(
        "https://github.com/{}/{}/blob/{}/{}",
        owner,
        repo,
        branch.unwrap_or(DEFAULT_BRANCH),
        encode_path(path)
    )
}

/// Raw content: `https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}`.
pub fn build_raw_url(owner: &str, repo: &str, path: &str, branch: Option<&str>) -> String {
    format!(
        "https://raw.githubusercontent.com/{}/{}/{}/{}",
        owner,
        repo,
        branch.unwrap_or(DEFAULT_BRANCH),
        encode_path(path)
    )
}

// Percent-encodes a decoded repository path for use in a URL
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Repository home page, where GitHub renders the README.
pub fn build_readme_url(owner: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}", owner, repo)
}
