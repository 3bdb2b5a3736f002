//! Text splitters for bounded-size chunking
//!
//! This crate splits documents into chunks that respect a size limit, for
//! feeding large texts into systems with bounded input windows (RAG
//! pipelines, embedding models, LLM context assembly).
//!
//! # Available Splitters
//!
//! - [`CharacterTextSplitter`]: Split on a single separator (e.g., "\n\n")
//! - [`RecursiveCharacterTextSplitter`]: Recursively split on multiple
//!   separators, in priority order
//! - [`TokenTextSplitter`]: Split the token stream directly into windows
//! - [`MarkdownTextSplitter`]: Separator preset for Markdown documents
//!
//! Chunk size is measured by a pluggable length function: character count
//! by default, token count when constructed through
//! [`RecursiveCharacterTextSplitter::from_tokenizer`] or
//! [`TokenTextSplitter`].
//!
//! # Example
//!
//! ```
//! use textflow::{TextSplitter, CharacterTextSplitter};
//!
//! let splitter = CharacterTextSplitter::new()
//!     .with_chunk_size(100)
//!     .with_chunk_overlap(20);
//!
//! let text = "This is a long document that needs to be split into smaller chunks.";
//! let chunks = splitter.split_text(text);
//! ```

mod character;
mod documents;
mod error;
mod markdown;
mod split_utils;
mod token;
mod traits;

pub use character::{
    CharacterTextSplitter, LengthFn, RecursiveCharacterTextSplitter, SplitterConfig,
};
pub use documents::Document;
pub use error::{Error, Result};
pub use markdown::MarkdownTextSplitter;
pub use token::{TiktokenTokenizer, TokenTextSplitter, Tokenizer};
pub use traits::{KeepSeparator, TextSplitter};
