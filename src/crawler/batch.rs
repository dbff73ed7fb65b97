// src/crawler/batch.rs
// =============================================================================
// Input and output records for batch fetches.
//
// Both derive Serialize/Deserialize so a batch can be read from a JSON
// manifest and its results printed as JSON.
// =============================================================================

use serde::{Deserialize, Serialize};

/// One file to fetch: a GitHub URL, plus a path when the URL has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl BatchItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), path: None }
    }

    pub fn with_path(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self { url: url.into(), path: Some(path.into()) }
    }

    /// Name the result is reported under: the explicit path, else the URL.
    pub fn label(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.url)
    }
}

/// Outcome of one batch item. Exactly one of `content` / `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl BatchResult {
    pub fn succeeded(path: impl Into<String>, content: String) -> Self {
        Self {
            path: path.into(),
            content: Some(content),
            error: None,
            success: true,
        }
    }

    pub fn failed(path: impl Into<String>, error: String) -> Self {
        Self {
            path: path.into(),
            content: None,
            error: Some(error),
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_path() {
        assert_eq!(BatchItem::new("https://github.com/o/r").label(), "https://github.com/o/r");
        assert_eq!(BatchItem::with_path("https://github.com/o/r", "a.md").label(), "a.md");
    }

    #[test]
    fn test_manifest_deserialize() {
        let json = r#"[
            {"url": "https://github.com/o/r/blob/main/a.md"},
            {"url": "https://github.com/o/r", "path": "docs/b.md"},
            {"url": "https://github.com/o/r", "path": null}
        ]"#;
        let items: Vec<BatchItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].path, None);
        assert_eq!(items[1].path.as_deref(), Some("docs/b.md"));
        assert_eq!(items[2].path, None);
    }

    #[test]
    fn test_result_serialize_omits_missing_fields() {
        let ok = serde_json::to_value(BatchResult::succeeded("a.md", "hi".to_string())).unwrap();
        assert_eq!(ok, serde_json::json!({"path": "a.md", "content": "hi", "success": true}));

        let failed = serde_json::to_value(BatchResult::failed("b.md", "boom".to_string())).unwrap();
        assert_eq!(failed, serde_json::json!({"path": "b.md", "error": "boom", "success": false}));
    }
}
