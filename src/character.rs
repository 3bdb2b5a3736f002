//! Character-based text splitters

use crate::error::{Error, Result};
use crate::split_utils::{
    compile_separator, separator_pattern, split_into_chars, split_keep_separator,
    split_on_separator,
};
use crate::traits::{KeepSeparator, TextSplitter};
use regex::Regex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Measures text in the units chunks are sized by.
///
/// Character counting is the default; token-aware splitters install a
/// closure over an external tokenizer instead. The splitter assumes the
/// function is deterministic and non-decreasing under concatenation, and
/// otherwise treats it as opaque.
pub type LengthFn = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// Shared configuration for text splitters
#[derive(Clone)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub length_function: LengthFn,
    pub keep_separator: KeepSeparator,
    pub add_start_index: bool,
    pub strip_whitespace: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 200,
            length_function: Arc::new(|s: &str| s.chars().count()),
            keep_separator: KeepSeparator::default(),
            add_start_index: false,
            strip_whitespace: true,
        }
    }
}

impl fmt::Debug for SplitterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitterConfig")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("keep_separator", &self.keep_separator)
            .field("add_start_index", &self.add_start_index)
            .field("strip_whitespace", &self.strip_whitespace)
            .finish_non_exhaustive()
    }
}

impl SplitterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "chunk_size must be > 0, got {}",
                self.chunk_size
            )));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfiguration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn measure(&self, text: &str) -> usize {
        (self.length_function)(text)
    }

    /// Greedily merge `splits` into chunks bounded by `chunk_size`, carrying
    /// `chunk_overlap` length-units of trailing content into each new chunk.
    ///
    /// `separator` is re-inserted between neighboring splits while joining
    /// (empty when the separator is already attached to the splits). A
    /// single split larger than `chunk_size` is emitted whole; the size
    /// bound cannot hold for atomic oversized units.
    pub(crate) fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let separator_len = self.measure(separator);
        let mut chunks = Vec::new();

        // Window of pending split indices and its measured length,
        // separators included.
        let mut window: VecDeque<usize> = VecDeque::new();
        let mut total = 0usize;

        for (idx, split) in splits.iter().enumerate() {
            let len = self.measure(split);
            let joining_len = if window.is_empty() { 0 } else { separator_len };

            if total + len + joining_len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        chunk_length = total,
                        chunk_size = self.chunk_size,
                        "emitted a chunk longer than the configured chunk_size"
                    );
                }

                if !window.is_empty() {
                    if let Some(chunk) = self.join_window(&window, splits, separator) {
                        chunks.push(chunk);
                    }

                    // Shrink from the front until the retained tail fits the
                    // overlap budget and leaves room for the next split.
                    while total > self.chunk_overlap
                        || (total > 0
                            && total
                                + len
                                + if window.is_empty() { 0 } else { separator_len }
                                > self.chunk_size)
                    {
                        let Some(front) = window.pop_front() else {
                            break;
                        };
                        let removed = self.measure(&splits[front]);
                        total -= removed + if window.is_empty() { 0 } else { separator_len };
                    }
                }
            }

            window.push_back(idx);
            total += len + if window.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = self.join_window(&window, splits, separator) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join_window(
        &self,
        window: &VecDeque<usize>,
        splits: &[String],
        separator: &str,
    ) -> Option<String> {
        if window.is_empty() {
            return None;
        }
        let joined = window
            .iter()
            .map(|&i| splits[i].as_str())
            .collect::<Vec<_>>()
            .join(separator);
        let joined = if self.strip_whitespace {
            joined.trim().to_string()
        } else {
            joined
        };
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// A text splitter that splits on a single separator.
///
/// # Example
///
/// ```
/// use textflow::{CharacterTextSplitter, TextSplitter};
///
/// let splitter = CharacterTextSplitter::new()
///     .with_chunk_size(20)
///     .with_chunk_overlap(0)
///     .with_separator("\n\n");
///
/// let text = "Paragraph 1.\n\nParagraph 2.\n\nParagraph 3.";
/// let chunks = splitter.split_text(text);
/// assert_eq!(chunks.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterTextSplitter {
    config: SplitterConfig,
    separator: String,
    is_separator_regex: bool,
    // Compiled separator; None when the pattern failed to compile, in which
    // case splitting falls back to the on-the-fly path.
    regex: Option<Regex>,
}

impl CharacterTextSplitter {
    /// Create a new `CharacterTextSplitter` splitting on blank lines.
    #[must_use]
    pub fn new() -> Self {
        let separator = "\n\n".to_string();
        let regex = compile_separator(&separator_pattern(&separator, false)).ok();

        Self {
            config: SplitterConfig {
                keep_separator: KeepSeparator::False,
                ..Default::default()
            },
            separator,
            is_separator_regex: false,
            regex,
        }
    }

    /// Set the separator to split on
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self.recompile();
        self
    }

    /// Set whether the separator is a regex pattern
    #[must_use]
    pub fn with_separator_regex(mut self, is_regex: bool) -> Self {
        self.is_separator_regex = is_regex;
        self.recompile();
        self
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the chunk overlap
    #[must_use]
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set whether to keep the separator and on which side
    #[must_use]
    pub fn with_keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.config.keep_separator = keep;
        self
    }

    /// Set the length function used to measure chunks
    #[must_use]
    pub fn with_length_function(mut self, length_function: LengthFn) -> Self {
        self.config.length_function = length_function;
        self
    }

    /// Set whether `create_documents` records `start_index` metadata
    #[must_use]
    pub fn with_add_start_index(mut self, add: bool) -> Self {
        self.config.add_start_index = add;
        self
    }

    /// Set whether emitted chunks are trimmed of surrounding whitespace
    #[must_use]
    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.config.strip_whitespace = strip;
        self
    }

    /// Validate the configuration, failing on invalid sizes or an
    /// uncompilable separator pattern.
    pub fn build(self) -> Result<Self> {
        self.config.validate()?;

        if !self.separator.is_empty() && self.regex.is_none() {
            let pattern = separator_pattern(&self.separator, self.is_separator_regex);
            if let Err(e) = compile_separator(&pattern) {
                return Err(Error::InvalidConfiguration(format!(
                    "invalid separator pattern: {e}"
                )));
            }
        }

        Ok(self)
    }

    fn recompile(&mut self) {
        self.regex = if self.separator.is_empty() {
            None
        } else {
            compile_separator(&separator_pattern(&self.separator, self.is_separator_regex)).ok()
        };
    }
}

impl Default for CharacterTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSplitter for CharacterTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        let splits = if self.separator.is_empty() {
            split_into_chars(text)
        } else if let Some(regex) = &self.regex {
            split_keep_separator(text, regex, self.config.keep_separator)
        } else {
            split_on_separator(
                text,
                &separator_pattern(&self.separator, self.is_separator_regex),
                self.config.keep_separator,
            )
        };

        // With the separator attached to the splits, joining re-inserts
        // nothing; otherwise the separator goes back between neighbors.
        let merge_separator = if self.config.keep_separator == KeepSeparator::False {
            self.separator.as_str()
        } else {
            ""
        };

        self.config.merge_splits(&splits, merge_separator)
    }

    fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.config.chunk_overlap
    }

    fn add_start_index(&self) -> bool {
        self.config.add_start_index
    }
}

/// A text splitter that recursively falls back through a prioritized
/// separator list.
///
/// The first separator that occurs in a segment is used to split it; pieces
/// still larger than the chunk size are re-split with the remaining,
/// lower-priority separators. A piece that no separator can break is
/// emitted whole, even when it exceeds the chunk size.
///
/// # Example
///
/// ```
/// use textflow::{RecursiveCharacterTextSplitter, TextSplitter};
///
/// let splitter = RecursiveCharacterTextSplitter::new()
///     .with_chunk_size(100)
///     .with_chunk_overlap(20);
///
/// let text = "This is a long text.\n\nIt has multiple paragraphs.\n\nAnd sentences.";
/// let chunks = splitter.split_text(text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveCharacterTextSplitter {
    config: SplitterConfig,
    separators: Vec<String>,
    is_separator_regex: bool,
    // One compiled regex per separator; None for the empty separator and
    // for patterns that failed to compile.
    compiled: Vec<Option<Regex>>,
}

impl RecursiveCharacterTextSplitter {
    /// Create a splitter with the default separators
    /// `["\n\n", "\n", " ", ""]`.
    #[must_use]
    pub fn new() -> Self {
        let separators = vec![
            "\n\n".to_string(),
            "\n".to_string(),
            " ".to_string(),
            String::new(),
        ];
        let compiled = Self::compile_separators(&separators, false);

        Self {
            config: SplitterConfig::default(),
            separators,
            is_separator_regex: false,
            compiled,
        }
    }

    /// Set custom separators, in priority order. An empty list behaves as a
    /// single empty separator: a pure greedy merge of raw characters.
    #[must_use]
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.compiled = Self::compile_separators(&separators, self.is_separator_regex);
        self.separators = separators;
        self
    }

    /// Set whether separators are regex patterns
    #[must_use]
    pub fn with_separator_regex(mut self, is_regex: bool) -> Self {
        self.is_separator_regex = is_regex;
        self.compiled = Self::compile_separators(&self.separators, is_regex);
        self
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the chunk overlap
    #[must_use]
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set whether to keep the separator and on which side
    #[must_use]
    pub fn with_keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.config.keep_separator = keep;
        self
    }

    /// Set the length function used to measure chunks
    #[must_use]
    pub fn with_length_function(mut self, length_function: LengthFn) -> Self {
        self.config.length_function = length_function;
        self
    }

    /// Set whether `create_documents` records `start_index` metadata
    #[must_use]
    pub fn with_add_start_index(mut self, add: bool) -> Self {
        self.config.add_start_index = add;
        self
    }

    /// Set whether emitted chunks are trimmed of surrounding whitespace
    #[must_use]
    pub fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.config.strip_whitespace = strip;
        self
    }

    /// Validate the configuration, failing on invalid sizes or an
    /// uncompilable separator pattern.
    pub fn build(self) -> Result<Self> {
        self.config.validate()?;

        for separator in &self.separators {
            if separator.is_empty() {
                continue;
            }
            let pattern = separator_pattern(separator, self.is_separator_regex);
            if let Err(e) = compile_separator(&pattern) {
                return Err(Error::InvalidConfiguration(format!(
                    "invalid separator pattern {separator:?}: {e}"
                )));
            }
        }

        Ok(self)
    }

    fn compile_separators(separators: &[String], is_regex: bool) -> Vec<Option<Regex>> {
        separators
            .iter()
            .map(|sep| {
                if sep.is_empty() {
                    None
                } else {
                    compile_separator(&separator_pattern(sep, is_regex)).ok()
                }
            })
            .collect()
    }

    /// Split one segment with the given separator slice, recursing into the
    /// remaining separators for pieces that are still too large.
    fn split_with_separators(
        &self,
        text: &str,
        separators: &[String],
        compiled: &[Option<Regex>],
    ) -> Vec<String> {
        // First separator that occurs in this segment wins; the empty
        // separator always matches. Nothing matching degrades to the last
        // entry, which splits into a single piece.
        let mut chosen = separators.len().saturating_sub(1);
        for (i, separator) in separators.iter().enumerate() {
            if separator.is_empty() {
                chosen = i;
                break;
            }
            if let Some(Some(regex)) = compiled.get(i) {
                if regex.is_match(text) {
                    chosen = i;
                    break;
                }
            }
        }

        let separator = &separators[chosen];
        let remaining = &separators[chosen + 1..];
        let remaining_compiled = &compiled[chosen + 1..];

        let splits = if separator.is_empty() {
            split_into_chars(text)
        } else if let Some(Some(regex)) = compiled.get(chosen) {
            split_keep_separator(text, regex, self.config.keep_separator)
        } else {
            // Pattern failed to compile earlier; the segment is unsplittable
            // at this level.
            vec![text.to_string()]
        };

        let merge_separator = if self.config.keep_separator == KeepSeparator::False {
            separator.as_str()
        } else {
            ""
        };

        let mut final_chunks = Vec::new();
        let mut good_splits: Vec<String> = Vec::new();

        for split in splits {
            if self.config.measure(&split) < self.config.chunk_size {
                good_splits.push(split);
                continue;
            }

            // The split is too large: flush what merges cleanly, then break
            // the split down with the remaining separators.
            if !good_splits.is_empty() {
                final_chunks.extend(self.config.merge_splits(&good_splits, merge_separator));
                good_splits.clear();
            }

            if remaining.is_empty() {
                final_chunks.push(split);
            } else {
                final_chunks.extend(self.split_with_separators(
                    &split,
                    remaining,
                    remaining_compiled,
                ));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.config.merge_splits(&good_splits, merge_separator));
        }

        final_chunks
    }
}

impl Default for RecursiveCharacterTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSplitter for RecursiveCharacterTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        if self.separators.is_empty() {
            let separators = vec![String::new()];
            return self.split_with_separators(text, &separators, &[None]);
        }

        self.split_with_separators(text, &self.separators, &self.compiled)
    }

    fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.config.chunk_overlap
    }

    fn add_start_index(&self) -> bool {
        self.config.add_start_index
    }
}

#[cfg(test)]
#[path = "character_tests.rs"]
mod character_tests;
