//! Tokenizer collaborator for the sparse engine
//!
//! The store treats tokenization as an external, deterministic function so
//! tests can inject fixed token streams.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]+").unwrap());

/// Deterministic text -> ordered token sequence
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Word-level tokenizer: lowercase, split on non-alphanumeric, skip
/// single-character tokens
#[derive(Debug, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        TOKEN_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(|s| s.len() > 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokens = WordTokenizer.tokenize("Hello, World! This is a test.");
        assert_eq!(tokens, vec!["hello", "world", "this", "is", "test"]);
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "Repeatable: BM25 scoring over passages.";
        assert_eq!(WordTokenizer.tokenize(text), WordTokenizer.tokenize(text));
    }

    #[test]
    fn test_tokenize_empty_text() {
        assert!(WordTokenizer.tokenize("").is_empty());
        assert!(WordTokenizer.tokenize("! ? .").is_empty());
    }
}
