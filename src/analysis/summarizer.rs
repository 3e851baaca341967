//! Extractive summarization scored by aggregate word frequency

use crate::analysis::text_processor::{truncate_chars, TextProcessor};
use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};
use std::collections::HashMap;

pub struct Summarizer {
    sentences: usize,
    max_sentence_words: usize,
    fallback_chars: usize,
}

struct ScoredSentence {
    index: usize,
    score: f64,
    too_long: bool,
}

impl Summarizer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            sentences: config.summary_sentences.max(1),
            max_sentence_words: config.max_sentence_words,
            fallback_chars: config.fallback_summary_chars,
        }
    }

    /// Select the highest scoring sentences and return them in document order.
    ///
    /// Texts that already fit in the summary budget come back unchanged.
    pub fn summarize(&self, processor: &TextProcessor, text: &str) -> Result<String> {
        let cleaned = processor.clean_text(text);
        if cleaned.is_empty() {
            return Err(AnalyzerError::TextProcessing("Nothing to summarize".to_string()));
        }

        let sentences = processor.split_sentences(&cleaned);
        if sentences.len() <= self.sentences {
            return Ok(text.trim().to_string());
        }

        let frequencies = Self::normalized_frequencies(processor, &cleaned);
        if frequencies.is_empty() {
            return Err(AnalyzerError::TextProcessing(
                "No content words to score sentences".to_string(),
            ));
        }

        let mut scored: Vec<ScoredSentence> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let score = processor
                    .tokenize(sentence)
                    .iter()
                    .filter_map(|token| frequencies.get(token))
                    .sum();
                let too_long = processor.words(sentence).len() > self.max_sentence_words;

                ScoredSentence { index, score, too_long }
            })
            .collect();

        // Highest score first, earlier sentences win ties
        scored.retain(|s| s.score > 0.0);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));

        // Over-long sentences only count when no short sentence scored
        let any_short = scored.iter().any(|s| !s.too_long);
        let mut chosen: Vec<usize> = scored
            .iter()
            .filter(|s| !any_short || !s.too_long)
            .take(self.sentences)
            .map(|s| s.index)
            .collect();

        if chosen.is_empty() {
            return Err(AnalyzerError::TextProcessing(
                "No sentence scored above zero".to_string(),
            ));
        }

        chosen.sort_unstable();

        Ok(chosen
            .into_iter()
            .map(|i| sentences[i].as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Degraded summary: the leading characters of the text
    pub fn fallback(&self, text: &str) -> String {
        let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let head = truncate_chars(&cleaned, self.fallback_chars);

        if head.len() < cleaned.len() {
            format!("{}...", head.trim_end())
        } else {
            cleaned
        }
    }

    fn normalized_frequencies(processor: &TextProcessor, text: &str) -> HashMap<String, f64> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in processor.tokenize(text) {
            if token.chars().all(char::is_alphabetic) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let max = counts.values().copied().max().unwrap_or(0) as f64;
        if max == 0.0 {
            return HashMap::new();
        }

        counts
            .into_iter()
            .map(|(word, count)| (word, count as f64 / max))
            .collect()
    }
}
