//! Descriptive text statistics

use crate::analysis::keywords::round_to;
use crate::analysis::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub word_count: usize,
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub unique_words: usize,
    pub average_word_length: f64,
    pub average_sentence_length: f64,
    /// Unique words over total words
    pub lexical_diversity: f64,
    pub reading_time_minutes: f64,
    pub extracted_characters: usize,
    pub analyzed_characters: usize,
    pub truncated: bool,
}

pub struct StatisticsCollector {
    words_per_minute: f64,
}

impl StatisticsCollector {
    pub fn new(words_per_minute: f64) -> Self {
        Self {
            words_per_minute: if words_per_minute > 0.0 {
                words_per_minute
            } else {
                200.0
            },
        }
    }

    /// Compute statistics over `text`, the possibly truncated analysis input.
    ///
    /// `extracted_characters` is the length of the full extracted text before truncation.
    pub fn collect(
        &self,
        processor: &TextProcessor,
        text: &str,
        extracted_characters: usize,
    ) -> TextStatistics {
        let cleaned = processor.clean_text(text);
        let words = processor.words(&cleaned);
        let sentence_count = processor.split_sentences(&cleaned).len();

        let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let word_count = words.len();
        let letters: usize = words.iter().map(|w| w.chars().count()).sum();
        let analyzed_characters = text.chars().count();

        let ratio = |numerator: f64, denominator: usize| {
            if denominator == 0 {
                0.0
            } else {
                numerator / denominator as f64
            }
        };

        TextStatistics {
            word_count,
            character_count: analyzed_characters,
            character_count_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
            sentence_count,
            paragraph_count: count_paragraphs(text),
            unique_words: unique.len(),
            average_word_length: round_to(ratio(letters as f64, word_count), 2),
            average_sentence_length: round_to(ratio(word_count as f64, sentence_count), 2),
            lexical_diversity: round_to(ratio(unique.len() as f64, word_count), 3),
            reading_time_minutes: round_to(word_count as f64 / self.words_per_minute, 2),
            extracted_characters,
            analyzed_characters,
            truncated: analyzed_characters < extracted_characters,
        }
    }
}

/// Blocks of non-blank lines separated by one or more blank lines
pub fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_statistics() {
        let text = "The cat sat.\nThe cat ran.\n\nA dog barked loudly.";
        let stats = StatisticsCollector::new(200.0).collect(&TextProcessor::new(), text, 100);

        assert_eq!(stats.word_count, 10);
        assert_eq!(stats.sentence_count, 3);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.unique_words, 8);
        assert_eq!(stats.lexical_diversity, 0.8);
        assert_eq!(stats.reading_time_minutes, 0.05);
        assert_eq!(stats.character_count, text.chars().count());
        assert_eq!(stats.analyzed_characters, text.chars().count());
        assert!(stats.truncated);
    }

    #[test]
    fn test_not_truncated_when_lengths_match() {
        let text = "Short text.";
        let stats = StatisticsCollector::new(200.0).collect(&TextProcessor::new(), text, text.len());
        assert!(!stats.truncated);
        assert_eq!(stats.character_count_no_spaces, 10);
    }

    #[test]
    fn test_empty_text() {
        let stats = StatisticsCollector::new(200.0).collect(&TextProcessor::new(), "", 0);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.average_word_length, 0.0);
        assert_eq!(stats.paragraph_count, 0);
    }

    #[test]
    fn test_paragraphs_ignore_whitespace_lines() {
        assert_eq!(count_paragraphs("one\n   \ntwo\nstill two\n\n\nthree"), 3);
    }
}
