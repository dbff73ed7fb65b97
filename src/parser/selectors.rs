// src/parser/selectors.rs
// =============================================================================
// The selector tables the parser walks, in priority order.
//
// GitHub has changed its page markup several times, so each table lists the
// containers seen across old and new renders. Adding or reordering a
// fallback means editing a table here, not the parser code.
// =============================================================================

use std::fmt;

/// What kind of container a selector is expected to hit. Logged when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorRole {
    RawContent,
    ReadmeContainer,
    MarkdownArticle,
    HighlightedCode,
    OriginalFileContents,
    Preformatted,
}

impl fmt::Display for SelectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectorRole::RawContent => "raw content",
            SelectorRole::ReadmeContainer => "readme container",
            SelectorRole::MarkdownArticle => "markdown article",
            SelectorRole::HighlightedCode => "highlighted code table",
            SelectorRole::OriginalFileContents => "original file contents",
            SelectorRole::Preformatted => "preformatted block",
        };
        f.write_str(name)
    }
}

/// How many matching elements make up the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The first matching element.
    First,
    /// Every matching element, one per line (code tables render one row per line).
    JoinLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorRule {
    pub css: &'static str,
    pub role: SelectorRole,
    pub mode: MatchMode,
}

const fn first(css: &'static str, role: SelectorRole) -> SelectorRule {
    SelectorRule { css, role, mode: MatchMode::First }
}

pub const FILE_CONTENT_SELECTORS: &[SelectorRule] = &[
    first(r#"div[data-testid="raw-content"]"#, SelectorRole::RawContent),
    first("div.readme", SelectorRole::ReadmeContainer),
    first("article.markdown-body", SelectorRole::MarkdownArticle),
    SelectorRule {
        css: "table.highlight tbody td.blob-code",
        role: SelectorRole::HighlightedCode,
        mode: MatchMode::JoinLines,
    },
    first(r#"div[data-testid="original-file-contents"]"#, SelectorRole::OriginalFileContents),
    first("pre", SelectorRole::Preformatted),
];

/// Elements that may carry the file body in an attribute.
pub const RAW_DATA_SELECTOR: &str = "[data-raw], [data-paste-markdown-skip]";

/// Attributes checked on the RAW_DATA_SELECTOR match, in order.
pub const RAW_DATA_ATTRIBUTES: &[&str] = &["data-raw", "data-paste-markdown-skip"];

pub const README_SELECTORS: &[SelectorRule] = &[
    first(r#"article[data-testid="readme"]"#, SelectorRole::MarkdownArticle),
    first("div#readme article", SelectorRole::ReadmeContainer),
    first("div.readme article", SelectorRole::ReadmeContainer),
    first("article.markdown-body", SelectorRole::MarkdownArticle),
];

/// Removed from README text found through README_SELECTORS.
pub const README_NOISE: &str = r#"button, [role="button"], .octo-link"#;

/// Removed from README text found by the "mentions readme" heuristic.
pub const HEURISTIC_NOISE: &str = r#"button, [role="button"]"#;

/// Headings the heuristic requires inside a README candidate.
pub const README_HEADINGS: &str = "h1, h2, h3";

/// One way of spotting an error banner on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMarker {
    /// Any element matching the selector.
    Selector(&'static str),
    /// An `<h1>` whose text contains the phrase (case sensitive).
    HeadingContains(&'static str),
}

pub const ERROR_MARKERS: &[ErrorMarker] = &[
    ErrorMarker::Selector(r#"div[data-testid="error"]"#),
    ErrorMarker::Selector(".error-message"),
    ErrorMarker::Selector(".flash-error"),
    ErrorMarker::HeadingContains("Not Found"),
    ErrorMarker::HeadingContains("Repository not found"),
    ErrorMarker::HeadingContains("Page not found"),
];

// Lowercase phrases for the page state checks

pub const NOT_FOUND_TITLE_PHRASES: &[&str] = &["not found", "page not found"];

pub const NOT_FOUND_BODY_PHRASES: &[&str] = &["repository not found", "this is not the page you"];

pub const PRIVATE_BODY_PHRASES: &[&str] = &[
    "private repository",
    "repository is private",
    "access denied",
];
