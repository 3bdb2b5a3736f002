//! Token-window splitting and token-sized recursive splitting.
//!
//! Both strategies size chunks in gpt-4 tokens; the first windows the
//! token stream directly, the second keeps sentence boundaries and only
//! measures with the tokenizer.

use std::sync::Arc;
use textflow::{
    RecursiveCharacterTextSplitter, TextSplitter, TiktokenTokenizer, TokenTextSplitter, Tokenizer,
};

fn main() -> textflow::Result<()> {
    let tokenizer = Arc::new(TiktokenTokenizer::for_model("gpt-4")?);

    let text = "Tokenizers group bytes into subword units. Splitting on token \
boundaries keeps every chunk within a model's input budget, even when the \
character count varies wildly between scripts and languages. This example \
splits the same text twice and prints the token and character counts of \
every chunk.";

    println!("Token-based splitting");
    let splitter = TokenTextSplitter::new(tokenizer.clone())
        .with_chunk_size(20)
        .with_chunk_overlap(0)
        .build()?;
    for chunk in splitter.try_split_text(text)? {
        println!(
            "Tokens={}, Characters={}, Text={}",
            tokenizer.count(&chunk),
            chunk.chars().count(),
            chunk
        );
        println!("---");
    }

    println!("Token-sized recursive splitting");
    let splitter = RecursiveCharacterTextSplitter::from_tokenizer(tokenizer.clone())
        .with_chunk_size(20)
        .with_chunk_overlap(0)
        .build()?;
    for chunk in splitter.split_text(text) {
        println!(
            "Tokens={}, Characters={}, Text={}",
            tokenizer.count(&chunk),
            chunk.chars().count(),
            chunk
        );
        println!("---");
    }

    Ok(())
}
