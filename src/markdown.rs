//! Markdown-aware separator preset.

use crate::character::{LengthFn, RecursiveCharacterTextSplitter};
use crate::error::Result;
use crate::traits::{KeepSeparator, TextSplitter};

/// A [`RecursiveCharacterTextSplitter`] configured with separators that
/// prefer Markdown structure: headings first, then fenced code blocks and
/// horizontal rules, then paragraphs, lines, and words.
#[derive(Debug, Clone)]
pub struct MarkdownTextSplitter {
    inner: RecursiveCharacterTextSplitter,
}

impl MarkdownTextSplitter {
    /// Create a new `MarkdownTextSplitter` with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RecursiveCharacterTextSplitter::new()
                .with_separators(Self::separators())
                .with_separator_regex(true)
                .with_keep_separator(KeepSeparator::Start),
        }
    }

    fn separators() -> Vec<String> {
        vec![
            r"\n#{1,6} ".to_string(),
            "```\n".to_string(),
            r"\n\*\*\*+\n".to_string(),
            r"\n---+\n".to_string(),
            r"\n___+\n".to_string(),
            "\n\n".to_string(),
            "\n".to_string(),
            " ".to_string(),
            String::new(),
        ]
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.inner = self.inner.with_chunk_size(chunk_size);
        self
    }

    /// Set the chunk overlap
    #[must_use]
    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.inner = self.inner.with_chunk_overlap(chunk_overlap);
        self
    }

    /// Set the length function used to measure chunks
    #[must_use]
    pub fn with_length_function(mut self, length_function: LengthFn) -> Self {
        self.inner = self.inner.with_length_function(length_function);
        self
    }

    /// Validate the configuration
    pub fn build(self) -> Result<Self> {
        Ok(Self {
            inner: self.inner.build()?,
        })
    }
}

impl Default for MarkdownTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSplitter for MarkdownTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.inner.split_text(text)
    }

    fn chunk_size(&self) -> usize {
        self.inner.chunk_size()
    }

    fn chunk_overlap(&self) -> usize {
        self.inner.chunk_overlap()
    }

    fn add_start_index(&self) -> bool {
        self.inner.add_start_index()
    }
}
