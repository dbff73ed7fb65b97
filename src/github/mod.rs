// src/github/mod.rs
// =============================================================================
// GitHub URL handling.
//
// - Parsing web URLs into owner / repo / path
// - Building raw.githubusercontent.com, blob-view and repository-home URLs
// =============================================================================

mod repo_url;

pub use repo_url::{
    build_file_url, build_raw_url, build_readme_url, is_valid_github_url, parse_github_url,
    RepoRef, DEFAULT_BRANCH,
};
