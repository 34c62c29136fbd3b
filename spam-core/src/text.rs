//! Text normalization
//!
//! Turns raw message text into the space-separated stem sequence the
//! vectorizer was fitted on: lowercase, tokenize, drop stopwords and
//! punctuation, stem, rejoin.

use regex::Regex;
use std::collections::HashSet;
use stop_words::LANGUAGE;

/// Negated contractions first, then word runs, then punctuation runs.
const TOKEN_PATTERN: &str = r"\w+n't|\w+|[^\w\s]+";

/// Clitic split off negated contractions ("can't" -> "ca", "n't")
const NEGATION: &str = "n't";

/// ASCII punctuation characters
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Text normalizer
pub struct TextNormalizer {
    token_re: Regex,
    stopwords: HashSet<String>,
    punctuation: HashSet<String>,
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("stopwords", &self.stopwords.len())
            .field("stemmer", &"porter")
            .finish()
    }
}

impl TextNormalizer {
    /// Create a normalizer with the NLTK English stopword list
    pub fn new() -> Self {
        Self {
            token_re: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
            stopwords: stop_words::get(LANGUAGE::English)
                .iter()
                .map(|w| w.to_string())
                .collect(),
            punctuation: PUNCTUATION.chars().map(String::from).collect(),
        }
    }

    /// Normalize raw text into a space-separated sequence of stems
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        self.tokenize(&lowered)
            .filter(|token| self.keep(token))
            .map(stem)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Split lowercased text into word and punctuation tokens
    fn tokenize<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.token_re.find_iter(text).flat_map(|m| {
            let token = m.as_str();
            match token.strip_suffix(NEGATION) {
                Some(head) if !head.is_empty() => vec![head, NEGATION],
                _ => vec![token],
            }
        })
    }

    fn keep(&self, token: &str) -> bool {
        token.chars().all(char::is_alphanumeric)
            && !self.stopwords.contains(token)
            && !self.punctuation.contains(token)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Porter stem of an ASCII token; other tokens pass through unchanged.
fn stem(token: &str) -> String {
    if token.is_ascii() {
        porter_stemmer::stem(token)
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_drops_stopwords() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("WIN A FREE PRIZE NOW!!!"), "win free prize");
    }

    #[test]
    fn test_stems_tokens() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("See you at the meeting tomorrow"),
            "see meet tomorrow"
        );
    }

    #[test]
    fn test_porter_stems() {
        let normalizer = TextNormalizer::new();
        // words where Porter and Porter2 (Snowball English) disagree
        for (word, expected) in [
            ("weekly", "weekli"),
            ("generate", "gener"),
            ("communication", "commun"),
            ("fairly", "fairli"),
            ("holiday", "holidai"),
        ] {
            assert_eq!(normalizer.normalize(word), expected, "{}", word);
        }
    }

    #[test]
    fn test_contraction_pieces_are_removed() {
        let normalizer = TextNormalizer::new();
        // "don't" splits into "do" and "n't": a stopword and a non-word
        assert_eq!(normalizer.normalize("don't"), "");
    }

    #[test]
    fn test_negated_contractions_keep_their_head() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("I can't come"), "ca come");
        assert_eq!(normalizer.normalize("WON'T"), "wo");
    }

    #[test]
    fn test_only_stopwords_and_punctuation_is_empty() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("the, and... is!? --"), "");
        assert_eq!(normalizer.normalize("isn't it?"), "");
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_underscore_tokens_are_not_alphanumeric() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("snake_case cash"), "cash");
    }

    #[test]
    fn test_digits_are_kept() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("Call 08002986030 now"), "call 08002986030");
    }

    #[test]
    fn test_non_ascii_words_are_not_stemmed() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("Café crème"), "café crème");
    }

    #[test]
    fn test_punctuation_set_is_ascii() {
        assert_eq!(PUNCTUATION.len(), 32);
        assert!(PUNCTUATION.chars().all(|c| c.is_ascii_punctuation()));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = TextNormalizer::new();
        let text = "Congratulations! You've been selected for a CASH award, claim today.";
        let first = normalizer.normalize(text);
        let second = normalizer.normalize(text);
        assert_eq!(first, second);
        assert!(first.split(' ').all(|t| t.chars().all(char::is_alphanumeric)));
        assert_eq!(first, first.to_lowercase());
    }
}
