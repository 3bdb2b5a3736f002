//! Property tests for the chunking invariants: coverage, size bound, and
//! overlap behavior.

use proptest::prelude::*;
use textflow::{KeepSeparator, RecursiveCharacterTextSplitter, TextSplitter};

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Last `n` characters of `text`.
fn tail_chars(text: &str, n: usize) -> String {
    let len = char_len(text);
    text.chars().skip(len.saturating_sub(n)).collect()
}

proptest! {
    /// With the separator kept on the preceding piece, no whitespace
    /// stripping, and no overlap, the chunks concatenate back to the input
    /// exactly: nothing lost, nothing duplicated.
    #[test]
    fn concatenation_reconstructs_input(
        text in "[ -~\\n]{0,120}",
        chunk_size in 1usize..24,
    ) {
        let splitter = RecursiveCharacterTextSplitter::new()
            .with_keep_separator(KeepSeparator::End)
            .with_strip_whitespace(false)
            .with_chunk_size(chunk_size)
            .with_chunk_overlap(0);

        let chunks = splitter.split_text(&text);
        prop_assert_eq!(chunks.concat(), text);
    }

    /// With the default separators (character-level last resort), every
    /// chunk respects the size bound: nothing is atomic beyond one
    /// character, so the oversize exception never applies.
    #[test]
    fn chunks_respect_size_bound(
        text in "[a-zA-Zあ-ん .\\n]{0,120}",
        chunk_size in 1usize..30,
        overlap_raw in 0usize..30,
    ) {
        let chunk_overlap = overlap_raw % chunk_size;
        let splitter = RecursiveCharacterTextSplitter::new()
            .with_chunk_size(chunk_size)
            .with_chunk_overlap(chunk_overlap);

        for chunk in splitter.split_text(&text) {
            prop_assert!(
                char_len(&chunk) <= chunk_size,
                "chunk {:?} has {} chars, limit {}",
                chunk, char_len(&chunk), chunk_size
            );
        }
    }

    /// Raw character merging: each chunk after the first starts with
    /// exactly the previous chunk's trailing `chunk_overlap` characters,
    /// and dropping that prefix from every non-first chunk reconstructs
    /// the input.
    #[test]
    fn char_merge_overlap_is_exact(
        text in "[a-z]{0,100}",
        chunk_size in 2usize..20,
        overlap_raw in 0usize..20,
    ) {
        let chunk_overlap = overlap_raw % chunk_size;
        let splitter = RecursiveCharacterTextSplitter::new()
            .with_separators(vec![])
            .with_strip_whitespace(false)
            .with_chunk_size(chunk_size)
            .with_chunk_overlap(chunk_overlap);

        let chunks = splitter.split_text(&text);

        for pair in chunks.windows(2) {
            let carried = tail_chars(&pair[0], chunk_overlap);
            prop_assert!(
                pair[1].starts_with(&carried),
                "chunk {:?} does not continue {:?} (overlap {})",
                pair[1], pair[0], chunk_overlap
            );
        }

        let mut reconstructed = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                reconstructed.push_str(chunk);
            } else {
                reconstructed.extend(chunk.chars().skip(chunk_overlap));
            }
        }
        prop_assert_eq!(reconstructed, text);
    }

    /// Empty input never produces chunks, whatever the configuration.
    #[test]
    fn empty_input_yields_nothing(
        chunk_size in 1usize..50,
        overlap_raw in 0usize..50,
    ) {
        let chunk_overlap = overlap_raw % chunk_size;
        let splitter = RecursiveCharacterTextSplitter::new()
            .with_chunk_size(chunk_size)
            .with_chunk_overlap(chunk_overlap);

        prop_assert!(splitter.split_text("").is_empty());
    }
}
