//! Regex-based splitting helpers shared by the character splitters.

use crate::traits::KeepSeparator;
use regex::{Regex, RegexBuilder};

/// Maximum size in bytes for compiled regex patterns (256KB).
/// Bounds resource usage for pathologically complex separator patterns.
const REGEX_SIZE_LIMIT: usize = 256 * 1024;

/// Maximum size in bytes for the regex DFA cache (256KB).
const REGEX_DFA_SIZE_LIMIT: usize = 256 * 1024;

/// Compile a separator pattern with size limits.
pub(crate) fn compile_separator(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
}

/// The regex pattern for a separator: escaped when the separator is a
/// literal, verbatim when it is already a pattern.
pub(crate) fn separator_pattern(separator: &str, is_regex: bool) -> String {
    if is_regex {
        separator.to_string()
    } else {
        regex::escape(separator)
    }
}

/// Split `text` into individual characters (Unicode codepoints).
pub(crate) fn split_into_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

/// Split `text` on a compiled separator regex, placing each matched
/// separator per `keep_separator`.
///
/// Empty pieces are dropped; with `Start` or `End` the surviving pieces
/// concatenate back to the input exactly.
pub(crate) fn split_keep_separator(
    text: &str,
    regex: &Regex,
    keep_separator: KeepSeparator,
) -> Vec<String> {
    match keep_separator {
        KeepSeparator::False => regex
            .split(text)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        KeepSeparator::Start => {
            // Pieces run from each match start to the next match start, plus
            // any leading text before the first match.
            let mut pieces = Vec::new();
            let matches: Vec<_> = regex.find_iter(text).collect();

            if matches.is_empty() {
                if !text.is_empty() {
                    pieces.push(text.to_string());
                }
                return pieces;
            }

            if matches[0].start() > 0 {
                pieces.push(text[..matches[0].start()].to_string());
            }

            for (i, m) in matches.iter().enumerate() {
                let end = matches
                    .get(i + 1)
                    .map_or_else(|| text.len(), |next| next.start());
                if end > m.start() {
                    pieces.push(text[m.start()..end].to_string());
                }
            }

            pieces
        }
        KeepSeparator::End => {
            // Pieces run up to and including each match, plus any trailing
            // text after the last match.
            let mut pieces = Vec::new();
            let mut last_end = 0;

            for m in regex.find_iter(text) {
                if m.end() > last_end {
                    pieces.push(text[last_end..m.end()].to_string());
                }
                last_end = m.end();
            }

            if last_end < text.len() {
                pieces.push(text[last_end..].to_string());
            }

            pieces
        }
    }
}

/// Split on a separator given as a pattern string, compiling on the fly.
///
/// An empty separator splits into characters. An uncompilable pattern
/// yields the whole text as a single piece.
pub(crate) fn split_on_separator(
    text: &str,
    pattern: &str,
    keep_separator: KeepSeparator,
) -> Vec<String> {
    if pattern.is_empty() {
        return split_into_chars(text);
    }
    match compile_separator(pattern) {
        Ok(regex) => split_keep_separator(text, &regex, keep_separator),
        Err(_) => vec![text.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        compile_separator(pattern).expect("test pattern compiles")
    }

    #[test]
    fn test_split_no_keep() {
        let result = split_keep_separator("Hello\n\nWorld\n\nTest", &re("\n\n"), KeepSeparator::False);
        assert_eq!(result, vec!["Hello", "World", "Test"]);

        // No separator present
        let result = split_keep_separator("Hello World", &re("\n\n"), KeepSeparator::False);
        assert_eq!(result, vec!["Hello World"]);

        // Consecutive separators produce no empty pieces
        let result = split_keep_separator("A\n\n\n\nB", &re("\n\n"), KeepSeparator::False);
        assert_eq!(result, vec!["A", "B"]);
    }

    #[test]
    fn test_split_keep_start() {
        let result = split_keep_separator("Hello\n\nWorld\n\nTest", &re("\n\n"), KeepSeparator::Start);
        assert_eq!(result, vec!["Hello", "\n\nWorld", "\n\nTest"]);

        // Separator at the very start
        let result = split_keep_separator("\n\nHello", &re("\n\n"), KeepSeparator::Start);
        assert_eq!(result, vec!["\n\nHello"]);

        // Concatenation reproduces the input
        let text = "a.b.c";
        let pieces = split_keep_separator(text, &re(r"\."), KeepSeparator::Start);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_split_keep_end() {
        let result = split_keep_separator("Hello\n\nWorld\n\nTest", &re("\n\n"), KeepSeparator::End);
        assert_eq!(result, vec!["Hello\n\n", "World\n\n", "Test"]);

        // Separator at the very end
        let result = split_keep_separator("Hello\n\n", &re("\n\n"), KeepSeparator::End);
        assert_eq!(result, vec!["Hello\n\n"]);

        // Concatenation reproduces the input
        let text = "a.b.c.";
        let pieces = split_keep_separator(text, &re(r"\."), KeepSeparator::End);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_split_into_chars() {
        assert_eq!(split_into_chars("Hi"), vec!["H", "i"]);
        assert!(split_into_chars("").is_empty());

        // Multi-byte codepoints stay whole
        assert_eq!(split_into_chars("你好"), vec!["你", "好"]);
    }

    #[test]
    fn test_split_on_separator_empty_pattern() {
        assert_eq!(split_on_separator("ab", "", KeepSeparator::False), vec!["a", "b"]);
    }

    #[test]
    fn test_split_on_separator_bad_pattern() {
        // Invalid regex falls back to the whole text
        assert_eq!(
            split_on_separator("abc", "(", KeepSeparator::False),
            vec!["abc"]
        );
    }

    #[test]
    fn test_separator_pattern_escaping() {
        assert_eq!(separator_pattern(".", false), r"\.");
        assert_eq!(separator_pattern(r"\d+", true), r"\d+");
    }
}
