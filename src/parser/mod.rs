// src/parser/mod.rs
// =============================================================================
// HTML parsing for github.com pages.
//
// Submodules:
// - selectors: the ordered selector tables and state-check phrases
// - page: GitHubParser, which applies those tables to a loaded page
//
// We use the `scraper` crate (html5ever underneath) for parsing and CSS
// selector matching.
// =============================================================================

mod page;
pub mod selectors;

pub use page::GitHubParser;
