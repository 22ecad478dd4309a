use serde::{Deserialize, Serialize};

/// Maximum number of characters kept in a citation snippet.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Compact, scored reference to an evidence document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// ID of the cited document.
    pub doc_id: String,
    /// Relevance score of the document at citation time.
    pub score: f64,
    /// First characters of the document text.
    pub snippet: String,
    /// URL or other locator, when the document has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    /// Source kind of the document (`kb`, `cluster`, `link`, `fallback`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Citation {
    pub fn new(doc_id: impl Into<String>, score: f64, snippet: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
            snippet: snippet.into(),
            locator: None,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }
}
