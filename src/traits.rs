//! Core splitting traits

use crate::documents::Document;
use std::collections::HashMap;

/// Where (if anywhere) a matched separator is kept in the produced splits.
///
/// The attachment side changes chunk boundaries but never loses text: with
/// `Start` or `End` the concatenation of all splits reproduces the input
/// exactly, while `False` drops the separator from the splits and re-inserts
/// it when merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeepSeparator {
    /// Drop the separator from splits; it is re-inserted between splits
    /// during merging.
    False,
    /// Keep the separator glued to the start of the following split.
    Start,
    /// Keep the separator glued to the end of the preceding split.
    #[default]
    End,
}

/// Common interface for all text splitters.
///
/// Implementors provide `split_text` plus the configured limits; document
/// handling (`create_documents`, `split_documents`) is derived from those.
pub trait TextSplitter {
    /// Split text into chunks.
    fn split_text(&self, text: &str) -> Vec<String>;

    /// The configured maximum chunk size, in length-function units.
    fn chunk_size(&self) -> usize;

    /// The configured overlap between consecutive chunks, in length-function
    /// units.
    fn chunk_overlap(&self) -> usize;

    /// Whether `create_documents` records each chunk's byte offset in the
    /// source text under the `start_index` metadata key.
    fn add_start_index(&self) -> bool;

    /// Split several texts and wrap the resulting chunks in [`Document`]s.
    ///
    /// `metadatas` is zipped with `texts`; missing entries default to empty
    /// metadata. When [`TextSplitter::add_start_index`] is enabled, each
    /// chunk's byte offset within its source text is recorded under
    /// `start_index`. Offsets are found by forward search from the previous
    /// chunk's position, so repeated chunk content resolves to the correct
    /// occurrence. A chunk that no longer appears verbatim in the source
    /// (e.g. after whitespace stripping around a regex separator) gets no
    /// `start_index` entry.
    fn create_documents(
        &self,
        texts: &[String],
        metadatas: &[HashMap<String, serde_json::Value>],
    ) -> Vec<Document> {
        let mut documents = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            let metadata = metadatas.get(i).cloned().unwrap_or_default();
            // Byte offset the next forward search starts from.
            let mut search_from = 0usize;

            for chunk in self.split_text(text) {
                let mut doc_metadata = metadata.clone();

                if self.add_start_index() {
                    if let Some(start) = find_from(text, &chunk, search_from) {
                        doc_metadata.insert("start_index".to_string(), start.into());
                        // Consecutive chunks overlap, but never start at the
                        // same offset; searching past the current start keeps
                        // duplicate chunk content anchored left-to-right.
                        search_from = start + 1;
                    }
                }

                documents.push(Document {
                    page_content: chunk,
                    metadata: doc_metadata,
                    id: None,
                });
            }
        }

        tracing::debug!(
            texts = texts.len(),
            chunks = documents.len(),
            "split texts into chunk documents"
        );

        documents
    }

    /// Split existing documents, carrying each document's metadata onto the
    /// chunks produced from it.
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let metadatas: Vec<HashMap<String, serde_json::Value>> =
            documents.iter().map(|d| d.metadata.clone()).collect();
        self.create_documents(&texts, &metadatas)
    }
}

/// Find `needle` in `haystack` starting at byte offset `from`, rounding
/// `from` up to the next char boundary.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let mut from = from.min(haystack.len());
    while from < haystack.len() && !haystack.is_char_boundary(from) {
        from += 1;
    }
    haystack.get(from..)?.find(needle).map(|i| i + from)
}
