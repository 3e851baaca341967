//! Text processing and normalization

use crate::analysis::patterns::{ABBREVIATIONS, PERSON_TITLES};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Normalize punctuation and collapse all whitespace to single spaces
    pub fn clean_text(&self, text: &str) -> String {
        let normalized = normalize_unicode(text);
        normalized.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Words containing at least one letter
    pub fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_words()
            .filter(|w| w.chars().any(char::is_alphabetic))
            .collect()
    }

    /// Lowercased content words with stop words and single letters removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in text.unicode_words() {
            let normalized = word.to_lowercase();

            if normalized.chars().count() > 1
                && !self.is_stop_word(&normalized)
                && normalized.chars().any(|c| c.is_alphabetic())
            {
                tokens.push(normalized);
            }
        }

        tokens
    }

    /// Split text into sentences that contain at least one word character.
    ///
    /// A segment ending in a title such as "Dr." is joined to the one after it,
    /// as is one ending in "e.g." or "Inc." unless the next segment starts
    /// with a capital.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut pending = String::new();
        let mut segments = text
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .peekable();

        while let Some(segment) = segments.next() {
            if !pending.is_empty() {
                pending.push(' ');
            }
            pending.push_str(segment);

            let joins_next = match segments.peek() {
                Some(next) => continues_after_abbreviation(segment, next),
                None => false,
            };
            if !joins_next {
                sentences.push(std::mem::take(&mut pending));
            }
        }

        sentences
            .into_iter()
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

fn continues_after_abbreviation(segment: &str, next: &str) -> bool {
    let last = match segment.split_whitespace().last() {
        Some(word) => word
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase(),
        None => return false,
    };
    if !last.ends_with('.') {
        return false;
    }

    if PERSON_TITLES.contains(last.as_str()) {
        return true;
    }
    ABBREVIATIONS.contains(last.as_str())
        && !next.chars().next().map_or(false, char::is_uppercase)
}

/// Truncate to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{00A0}' => ' ',
            _ => c,
        })
        .collect()
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an",
    "and", "any", "are", "aren't", "as", "at", "be", "because", "been", "before",
    "being", "below", "between", "both", "but", "by", "can", "cannot", "could",
    "couldn't", "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down",
    "during", "each", "either", "else", "etc", "ever", "every", "few", "for", "from",
    "further", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he",
    "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i",
    "i'm", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just",
    "let", "may", "me", "might", "more", "most", "much", "must", "my", "myself",
    "neither", "no", "nor", "not", "now", "of", "off", "often", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "per", "same",
    "shall", "she", "should", "shouldn't", "since", "so", "some", "such", "than",
    "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "these", "they", "this", "those", "through", "thus", "to", "too",
    "under", "until", "up", "upon", "us", "very", "via", "was", "wasn't", "we",
    "were", "weren't", "what", "when", "where", "whether", "which", "while", "who",
    "whom", "whose", "why", "will", "with", "within", "without", "won't", "would",
    "wouldn't", "yet", "you", "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_processing() {
        let processor = TextProcessor::new();
        let cleaned = processor.clean_text("Hello,   world!\nThis is a \u{201C}test\u{201D} document.");

        assert_eq!(cleaned, "Hello, world! This is a \"test\" document.");
        assert_eq!(processor.split_sentences(&cleaned).len(), 2);
        assert_eq!(processor.words(&cleaned).len(), 7);
        assert!(processor.tokenize(&cleaned).contains(&"document".to_string()));
    }

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert_eq!(tokens, vec!["rust", "programming", "language", "awesome"]);
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_sentence_split_skips_punctuation_only() {
        let processor = TextProcessor::new();
        let sentences = processor.split_sentences("First one.\n\n...\n\nSecond one!");

        assert_eq!(sentences, vec!["First one.", "Second one!"]);
    }

    #[test]
    fn test_sentence_split_keeps_titles_with_names() {
        let processor = TextProcessor::new();
        let sentences = processor.split_sentences("Dr. Alice Brown signed it. Mr. Smith agreed.");

        assert_eq!(sentences, vec!["Dr. Alice Brown signed it.", "Mr. Smith agreed."]);
    }

    #[test]
    fn test_sentence_split_after_company_suffix() {
        let processor = TextProcessor::new();
        let sentences = processor.split_sentences("Goods were sold by Acme Inc. The buyer paid in full.");

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], "Goods were sold by Acme Inc.");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
