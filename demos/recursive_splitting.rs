//! Recursive splitting with a sentence-boundary separator list.
//!
//! The separators cover both Latin and CJK punctuation, so mixed-language
//! documents split at sentence ends before falling back to paragraphs.

use textflow::{RecursiveCharacterTextSplitter, TextSplitter};

fn main() {
    let separators = [".", "。", "!", "！", "?", "？", ",", "、", "\n\n"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let splitter = RecursiveCharacterTextSplitter::new()
        .with_separators(separators)
        .with_chunk_size(100)
        .with_chunk_overlap(0);

    let text = "吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。\
何でも薄暗いじめじめした所でニャーニャー泣いていた事だけは記憶している。\
吾輩はここで始めて人間というものを見た。";

    let chunks = splitter.split_text(text);

    println!("Split text into {} chunks:", chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        println!("\nChunk {}:", i + 1);
        println!("{}", chunk);
        println!("Characters: {}", chunk.chars().count());
    }
}
