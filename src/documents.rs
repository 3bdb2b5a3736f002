//! Documents produced and consumed by text splitters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A piece of text with associated metadata.
///
/// Splitters consume documents through
/// [`TextSplitter::split_documents`](crate::TextSplitter::split_documents)
/// and produce one document per chunk, carrying the source document's
/// metadata onto every chunk.
///
/// # Example
///
/// ```
/// use textflow::Document;
///
/// let doc = Document::new("Hello, world!")
///     .with_metadata("source", "example.txt".to_string())
///     .with_metadata("page", 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The text content of the document
    pub page_content: String,

    /// Metadata associated with the document
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Optional unique identifier for the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Document {
    /// Create a new document with the given text content.
    ///
    /// # Example
    ///
    /// ```
    /// use textflow::Document;
    ///
    /// let doc = Document::new("Hello, world!");
    /// assert_eq!(doc.page_content, "Hello, world!");
    /// ```
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: HashMap::new(),
            id: None,
        }
    }

    /// Add metadata to the document (builder pattern).
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the document ID (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get metadata value by key.
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.metadata.is_empty() {
            write!(f, "page_content='{}'", self.page_content)
        } else {
            write!(
                f,
                "page_content='{}' metadata={:?}",
                self.page_content, self.metadata
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new("content");
        assert_eq!(doc.page_content, "content");
        assert!(doc.metadata.is_empty());
        assert!(doc.id.is_none());
    }

    #[test]
    fn test_with_metadata() {
        let doc = Document::new("content")
            .with_metadata("source", "a.txt".to_string())
            .with_metadata("page", 3);
        assert_eq!(
            doc.get_metadata("source"),
            Some(&serde_json::json!("a.txt"))
        );
        assert_eq!(doc.get_metadata("page"), Some(&serde_json::json!(3)));
    }

    #[test]
    fn test_serde_round_trip() {
        let doc = Document::new("content").with_metadata("k", "v".to_string());
        let json = serde_json::to_string(&doc).expect("serialize");
        let back: Document = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(doc, back);
    }

    #[test]
    fn test_display() {
        let doc = Document::new("hi");
        assert_eq!(doc.to_string(), "page_content='hi'");
    }
}
