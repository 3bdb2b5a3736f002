//! Token-based text splitting.
//!
//! Chunks here are sized in tokens rather than characters. The tokenizer is
//! an external collaborator behind the [`Tokenizer`] trait; the splitters
//! assume round-trip fidelity (`decode(encode(t)) == t`) but never verify
//! it. [`TiktokenTokenizer`] adapts `tiktoken-rs` BPE encodings.

use crate::character::{LengthFn, RecursiveCharacterTextSplitter};
use crate::error::{Error, Result};
use crate::traits::TextSplitter;
use std::fmt;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// An opaque external tokenizer.
///
/// `encode` must be deterministic for identical input; `decode` failures
/// are propagated to the caller unchanged, since the splitter cannot
/// produce a meaningful partial result without the decoded text.
pub trait Tokenizer: Send + Sync {
    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode token ids back into text.
    fn decode(&self, ids: &[u32]) -> Result<String>;

    /// Count the tokens in `text`.
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// [`Tokenizer`] backed by a `tiktoken-rs` BPE encoding.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Look up the encoding for a model name.
    ///
    /// Versioned model names fall back to their family encoding, and
    /// unknown models fall back to `cl100k_base`.
    pub fn for_model(model: &str) -> Result<Self> {
        if let Ok(bpe) = tiktoken_rs::get_bpe_from_model(model) {
            return Ok(Self { bpe });
        }

        let model_lower = model.to_lowercase();
        let family = if model_lower.contains("gpt-4") || model_lower.contains("gpt4") {
            Some("gpt-4")
        } else if model_lower.contains("gpt-3.5") || model_lower.contains("gpt3") {
            Some("gpt-3.5-turbo")
        } else {
            None
        };
        if let Some(family) = family {
            if let Ok(bpe) = tiktoken_rs::get_bpe_from_model(family) {
                return Ok(Self { bpe });
            }
        }

        Self::cl100k_base()
    }

    /// The `cl100k_base` encoding (GPT-4 / GPT-3.5 family).
    pub fn cl100k_base() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenTokenizer").finish_non_exhaustive()
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_with_special_tokens(text)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.bpe
            .decode(ids.to_vec())
            .map_err(|e| Error::Tokenizer(e.to_string()))
    }
}

/// A text splitter that windows the token stream directly.
///
/// The document is encoded once; ids are grouped into windows of
/// `chunk_size` tokens, consecutive windows repeating `chunk_overlap`
/// tokens, and each window is decoded back to text. Separators are never
/// consulted.
///
/// # Example
///
/// ```no_run
/// use textflow::{TokenTextSplitter, TextSplitter};
///
/// let splitter = TokenTextSplitter::for_model("gpt-4")
///     .map(|s| s.with_chunk_size(500).with_chunk_overlap(0))
///     .and_then(TokenTextSplitter::build)?;
///
/// let chunks = splitter.split_text("some long document");
/// # Ok::<(), textflow::Error>(())
/// ```
#[derive(Clone)]
pub struct TokenTextSplitter {
    tokenizer: Arc<dyn Tokenizer>,
    chunk_size: usize,
    chunk_overlap: usize,
    add_start_index: bool,
}

impl TokenTextSplitter {
    /// Create a splitter over an existing tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            tokenizer,
            chunk_size: 4000,
            chunk_overlap: 200,
            add_start_index: false,
        }
    }

    /// Create a splitter with the tiktoken encoding for `model`.
    pub fn for_model(model: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(TiktokenTokenizer::for_model(model)?)))
    }

    /// Set the chunk size, in tokens
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the chunk overlap, in tokens
    #[must_use]
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Set whether `create_documents` records `start_index` metadata
    #[must_use]
    pub fn with_add_start_index(mut self, add: bool) -> Self {
        self.add_start_index = add;
        self
    }

    /// Validate the configuration
    pub fn build(self) -> Result<Self> {
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
        Ok(self)
    }

    /// Split text on token windows, propagating tokenizer failures.
    ///
    /// A window boundary can land inside a multi-byte sequence, in which
    /// case decoding that window fails and the error surfaces here.
    pub fn try_split_text(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let ids = self.tokenizer.encode(text);
        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < ids.len() {
            let end = (start + self.chunk_size).min(ids.len());
            chunks.push(self.tokenizer.decode(&ids[start..end])?);

            if end == ids.len() {
                break;
            }
            start += step;
        }

        Ok(chunks)
    }
}

impl fmt::Debug for TokenTextSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenTextSplitter")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("add_start_index", &self.add_start_index)
            .finish_non_exhaustive()
    }
}

impl TextSplitter for TokenTextSplitter {
    /// Infallible entry point; a tokenizer failure is logged and yields no
    /// chunks. Use [`TokenTextSplitter::try_split_text`] to observe the
    /// error instead.
    fn split_text(&self, text: &str) -> Vec<String> {
        self.try_split_text(text).unwrap_or_else(|err| {
            tracing::error!(%err, "token splitting failed");
            Vec::new()
        })
    }

    fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    fn add_start_index(&self) -> bool {
        self.add_start_index
    }
}

impl RecursiveCharacterTextSplitter {
    /// Size chunks by token count instead of characters.
    ///
    /// The recursive separator algorithm is unchanged; only the length
    /// measurement goes through the tokenizer.
    #[must_use]
    pub fn from_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        let length_function: LengthFn = Arc::new(move |text: &str| tokenizer.count(text));
        Self::new().with_length_function(length_function)
    }

    /// Size chunks with the tiktoken encoding for `model`.
    pub fn from_tiktoken_model(model: &str) -> Result<Self> {
        let tokenizer = TiktokenTokenizer::for_model(model)?;
        Ok(Self::from_tokenizer(Arc::new(tokenizer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One token per character; id is the codepoint. Deterministic and
    /// round-trip faithful, so window arithmetic can be asserted exactly.
    struct CharTokenizer;

    impl Tokenizer for CharTokenizer {
        fn encode(&self, text: &str) -> Vec<u32> {
            text.chars().map(|c| c as u32).collect()
        }

        fn decode(&self, ids: &[u32]) -> Result<String> {
            ids.iter()
                .map(|&id| char::from_u32(id).ok_or_else(|| {
                    Error::Tokenizer(format!("invalid codepoint {id}"))
                }))
                .collect()
        }
    }

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TokenTextSplitter {
        TokenTextSplitter::new(Arc::new(CharTokenizer))
            .with_chunk_size(chunk_size)
            .with_chunk_overlap(chunk_overlap)
    }

    #[test]
    fn test_empty_input() {
        assert!(splitter(3, 0).split_text("").is_empty());
    }

    #[test]
    fn test_windows_without_overlap() {
        let chunks = splitter(3, 0).split_text("abcdefgh");
        assert_eq!(chunks, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_windows_with_overlap() {
        let chunks = splitter(3, 1).split_text("abcdefgh");
        assert_eq!(chunks, vec!["abc", "cde", "efg", "gh"]);

        // Consecutive windows share exactly one token
        for pair in chunks.windows(2) {
            let tail = pair[0].chars().last();
            let head = pair[1].chars().next();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_short_input_single_window() {
        let chunks = splitter(100, 10).split_text("short");
        assert_eq!(chunks, vec!["short"]);
    }

    #[test]
    fn test_coverage_without_overlap() {
        let text = "The quick brown fox jumps over the lazy dog";
        let chunks = splitter(7, 0).split_text(text);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_build_rejects_zero_chunk_size() {
        let err = splitter(0, 0).build();
        assert!(matches!(err, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_build_rejects_overlap_not_smaller() {
        let err = splitter(5, 5).build();
        assert!(matches!(err, Err(Error::InvalidConfiguration(_))));

        let err = splitter(5, 9).build();
        assert!(matches!(err, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_decode_failure_propagates() {
        struct BrokenTokenizer;
        impl Tokenizer for BrokenTokenizer {
            fn encode(&self, text: &str) -> Vec<u32> {
                vec![0; text.len()]
            }
            fn decode(&self, _ids: &[u32]) -> Result<String> {
                Err(Error::Tokenizer("decode table missing".to_string()))
            }
        }

        let splitter = TokenTextSplitter::new(Arc::new(BrokenTokenizer)).with_chunk_size(2);
        let err = splitter.try_split_text("abcd");
        assert!(matches!(err, Err(Error::Tokenizer(_))));

        // The trait entry point degrades to no chunks
        assert!(TextSplitter::split_text(&splitter, "abcd").is_empty());
    }

    #[test]
    fn test_recursive_splitter_sized_by_tokens() {
        let splitter = RecursiveCharacterTextSplitter::from_tokenizer(Arc::new(CharTokenizer))
            .with_chunk_size(10)
            .with_chunk_overlap(0);

        let text = "one two three four five six seven";
        let chunks = splitter.split_text(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10, "chunk too long: {chunk:?}");
        }
    }
}
