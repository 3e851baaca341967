//! Keyword extraction by term frequency

use crate::analysis::text_processor::TextProcessor;
use crate::config::AnalysisConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strsim::normalized_levenshtein;

/// Minimum similarity for two surface forms to count as one keyword
const VARIANT_SIMILARITY: f64 = 0.85;
const VARIANT_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub count: usize,
    /// Share of all candidate tokens, 4 decimals
    pub score: f64,
}

pub struct KeywordExtractor {
    max_keywords: usize,
}

impl KeywordExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_keywords: config.max_keywords,
        }
    }

    /// Rank content words by frequency, folding plural and inflected variants
    /// into the most frequent form.
    pub fn extract(&self, processor: &TextProcessor, text: &str) -> Result<Vec<Keyword>> {
        let candidates: Vec<String> = processor
            .tokenize(text)
            .into_iter()
            .filter(|t| t.chars().count() > 2 && t.chars().all(char::is_alphabetic))
            .collect();

        let total = candidates.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in candidates {
            *counts.entry(token).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        Self::sort_ranked(&mut ranked);

        let mut merged: Vec<(String, usize)> = Vec::new();
        for (word, count) in ranked {
            match merged.iter_mut().find(|(kept, _)| is_variant(kept, &word)) {
                Some(entry) => entry.1 += count,
                None => merged.push((word, count)),
            }
        }
        Self::sort_ranked(&mut merged);

        Ok(merged
            .into_iter()
            .take(self.max_keywords)
            .map(|(keyword, count)| Keyword {
                keyword,
                count,
                score: round_to(count as f64 / total as f64, 4),
            })
            .collect())
    }

    fn sort_ranked(ranked: &mut [(String, usize)]) {
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    }
}

fn is_variant(a: &str, b: &str) -> bool {
    let shared_prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count();

    shared_prefix >= VARIANT_PREFIX && normalized_levenshtein(a, b) >= VARIANT_SIMILARITY
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
