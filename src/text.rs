//! Text normalization: whitespace cleanup and Porter2 stemming

use rust_stemmers::{Algorithm, Stemmer};
use std::sync::LazyLock;

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Reduce a document to its canonical token sequence.
///
/// Splits on whitespace, lower-cases and stems every token, then rejoins
/// them with single spaces. Empty input is returned as-is.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.split_whitespace()
        .map(|token| STEMMER.stem(&token.to_lowercase()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize every document, preserving order
pub fn normalize_all<S: AsRef<str>>(texts: &[S]) -> Vec<String> {
    texts.iter().map(|t| normalize(t.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stems_inflected_forms_to_common_root() {
        assert_eq!(normalize("cats"), normalize("cat"));
        assert_eq!(normalize("running runs"), "run run");
        assert_eq!(normalize("connected connecting"), "connect connect");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  stocks \t rose\n today  "), "stock rose today");
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let text = "Dogs are barking at the running cats";
        assert_eq!(normalize(text), normalize(text));
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let docs = ["dogs bark", "", "stocks fell"];
        assert_eq!(normalize_all(&docs), vec!["dog bark", "", "stock fell"]);
    }
}
