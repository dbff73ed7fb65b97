// src/parser/page.rs
// =============================================================================
// Pulls file contents, README text and error states out of github.com pages.
//
// A GitHubParser holds one parsed document at a time. load() replaces it, and
// the extract_* methods fail with NotLoaded until load() has been called.
//
// The state checks (is_not_found, is_private) are plain substring matches on
// the page title and body text. A README that happens to say "access denied"
// will look like a private repository page.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::selectors::{
    ErrorMarker, MatchMode, SelectorRule, ERROR_MARKERS, FILE_CONTENT_SELECTORS, HEURISTIC_NOISE,
    NOT_FOUND_BODY_PHRASES, NOT_FOUND_TITLE_PHRASES, PRIVATE_BODY_PHRASES, RAW_DATA_ATTRIBUTES,
    RAW_DATA_SELECTOR, README_HEADINGS, README_NOISE, README_SELECTORS,
};
use crate::error::{CrawlerError, Result};

#[derive(Default)]
pub struct GitHubParser {
    document: Option<Html>,
}

impl GitHubParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `html`, replacing any previously loaded page.
    pub fn load(&mut self, html: &str) {
        self.document = Some(Html::parse_document(html));
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    fn document(&self) -> Result<&Html> {
        self.document.as_ref().ok_or(CrawlerError::NotLoaded)
    }

    /// Source text of the file shown on a blob page.
    pub fn extract_file_content(&self) -> Result<String> {
        let document = self.document()?;

        for rule in FILE_CONTENT_SELECTORS {
            let selector = compile(rule.css)?;
            if let Some(content) = match_rule(document, rule, &selector) {
                debug!("File content matched {} ({})", rule.css, rule.role);
                return Ok(content);
            }
        }

        if let Some(raw) = raw_data_attribute(document)? {
            debug!("File content taken from {} attribute", RAW_DATA_SELECTOR);
            return Ok(raw);
        }

        Err(CrawlerError::Extraction(
            "Could not extract file content. The page structure may have changed.".to_string(),
        ))
    }

    /// README text rendered on a repository home page, without button labels.
    pub fn extract_readme_content(&self) -> Result<String> {
        let document = self.document()?;
        let noise = compile(README_NOISE)?;

        for rule in README_SELECTORS {
            let selector = compile(rule.css)?;
            if let Some(element) = document.select(&selector).next() {
                debug!("README matched {} ({})", rule.css, rule.role);
                return Ok(text_without(element, &noise).trim().to_string());
            }
        }

        // Last resort: the first element that mentions "readme" and has a heading in it
        let everything = compile("*")?;
        let headings = compile(README_HEADINGS)?;
        let candidate = document.select(&everything).find(|element| {
            let text = element.text().collect::<String>().to_lowercase();
            text.contains("readme") && element.select(&headings).next().is_some()
        });

        if let Some(element) = candidate {
            debug!("README found by heuristic in <{}>", element.value().name());
            let noise = compile(HEURISTIC_NOISE)?;
            return Ok(text_without(element, &noise).trim().to_string());
        }

        Err(CrawlerError::Extraction(
            "Could not extract README content. The repository may not have a README.".to_string(),
        ))
    }

    /// Text of the first error banner on the page, if any.
    pub fn extract_error(&self) -> Option<String> {
        let document = self.document.as_ref()?;

        ERROR_MARKERS.iter().find_map(|marker| match marker {
            ErrorMarker::Selector(css) => {
                let selector = Selector::parse(css).ok()?;
                document
                    .select(&selector)
                    .map(element_text)
                    .find(|text| !text.is_empty())
            }
            ErrorMarker::HeadingContains(phrase) => {
                let selector = Selector::parse("h1").ok()?;
                document
                    .select(&selector)
                    .map(element_text)
                    .find(|text| text.contains(phrase))
            }
        })
    }

    /// Whether this is GitHub's 404 page.
    pub fn is_not_found(&self) -> bool {
        let Some(document) = self.document.as_ref() else {
            return false;
        };

        let title = first_text(document, "title").to_lowercase();
        let body = first_text(document, "body").to_lowercase();

        contains_any(&title, NOT_FOUND_TITLE_PHRASES) || contains_any(&body, NOT_FOUND_BODY_PHRASES)
    }

    /// Whether the page says the repository is private or access was denied.
    pub fn is_private(&self) -> bool {
        let Some(document) = self.document.as_ref() else {
            return false;
        };

        let body = first_text(document, "body").to_lowercase();
        contains_any(&body, PRIVATE_BODY_PHRASES)
    }
}

fn compile(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| CrawlerError::Extraction(format!("Invalid selector {:?}: {:?}", css, e)))
}

// Applies one rule; None if nothing matched or the match was blank
fn match_rule(document: &Html, rule: &SelectorRule, selector: &Selector) -> Option<String> {
    let content = match rule.mode {
        MatchMode::First => document.select(selector).next().map(element_text)?,
        MatchMode::JoinLines => {
            let lines: Vec<String> = document
                .select(selector)
                .map(|element| element.text().collect::<String>())
                .collect();
            lines.join("\n").trim().to_string()
        }
    };

    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

// Content stored in a data attribute, JSON-encoded or plain
fn raw_data_attribute(document: &Html) -> Result<Option<String>> {
    let selector = compile(RAW_DATA_SELECTOR)?;
    let Some(element) = document.select(&selector).next() else {
        return Ok(None);
    };

    let raw = RAW_DATA_ATTRIBUTES
        .iter()
        .filter_map(|name| element.value().attr(name))
        .find(|value| !value.is_empty());

    Ok(raw.map(|value| match serde_json::from_str::<String>(value) {
        Ok(decoded) => decoded,
        Err(_) => value.to_string(),
    }))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, css: &str) -> String {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .next()
            .map(|element| element.text().collect())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

// Text of `element`, skipping any subtree that matches `skip`
fn text_without(element: ElementRef<'_>, skip: &Selector) -> String {
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, skip: &Selector, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !skip.matches(&child_element) {
                collect_text(child_element, skip, out);
            }
        }
    }
}

fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| haystack.contains(phrase))
}
