//! Lexicon-based sentiment scoring

use crate::analysis::keywords::round_to;
use crate::analysis::text_processor::TextProcessor;
use crate::error::{AnalyzerError, Result};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Normalization constant for the compound score
const ALPHA: f64 = 15.0;
/// Scale applied to a negated valence
const NEGATION_SCALAR: f64 = -0.74;
const NEGATION_WINDOW: usize = 3;
const LABEL_THRESHOLD: f64 = 0.05;

lazy_static! {
    static ref LEXICON: HashMap<&'static str, f64> = [
        // positive
        ("good", 1.9), ("great", 3.1), ("excellent", 3.2), ("outstanding", 3.2),
        ("amazing", 2.8), ("wonderful", 2.7), ("fantastic", 2.6), ("positive", 2.3),
        ("happy", 2.7), ("pleased", 2.0), ("glad", 2.0), ("love", 3.2), ("like", 1.5),
        ("enjoy", 2.2), ("best", 3.2), ("better", 1.9), ("improve", 1.9),
        ("improved", 2.1), ("improvement", 2.0), ("success", 2.7), ("successful", 2.8),
        ("benefit", 2.0), ("beneficial", 1.9), ("effective", 2.1), ("efficient", 1.8),
        ("strong", 2.3), ("growth", 1.6), ("gain", 2.0), ("gains", 1.8),
        ("profit", 1.9), ("profitable", 1.9), ("win", 2.8), ("achieve", 1.8),
        ("achievement", 2.1), ("recommend", 1.5), ("satisfied", 1.8),
        ("satisfactory", 1.5), ("reliable", 1.9), ("secure", 1.4), ("safe", 1.9),
        ("clear", 1.6), ("helpful", 1.9), ("support", 1.7), ("opportunity", 1.8),
        ("innovative", 1.9), ("valuable", 2.1), ("favorable", 2.1), ("impressive", 2.3),
        ("exceptional", 2.9), ("perfect", 2.7), ("thank", 1.5), ("thanks", 1.9),
        ("welcome", 2.0), ("excited", 1.4), ("exciting", 2.2), ("optimistic", 1.3),
        ("confident", 2.2), ("robust", 1.3), ("stable", 1.2), ("healthy", 1.7),
        ("agree", 1.5), ("approved", 1.8), ("accomplished", 1.8), ("nice", 1.8),
        // negative
        ("bad", -2.5), ("poor", -2.1), ("terrible", -2.1), ("awful", -2.0),
        ("horrible", -2.5), ("worst", -3.1), ("worse", -2.1), ("negative", -2.7),
        ("sad", -2.1), ("unhappy", -1.8), ("angry", -2.3), ("hate", -2.7),
        ("dislike", -1.6), ("fail", -2.5), ("failed", -2.3), ("failure", -2.3),
        ("loss", -1.3), ("losses", -1.7), ("lose", -1.7), ("decline", -1.1),
        ("declined", -0.9), ("risk", -1.1), ("risks", -1.1), ("problem", -1.7),
        ("problems", -1.7), ("issue", -0.6), ("issues", -0.6), ("error", -1.4),
        ("errors", -1.4), ("defect", -1.4), ("damage", -2.2), ("damages", -1.9),
        ("breach", -1.6), ("violation", -2.2), ("penalty", -1.5), ("penalties", -1.6),
        ("dispute", -1.7), ("liability", -0.8), ("weak", -1.9), ("difficult", -1.5),
        ("concern", -1.4), ("concerns", -1.4), ("worried", -1.2), ("critical", -1.3),
        ("crisis", -3.1), ("danger", -2.4), ("dangerous", -2.1), ("threat", -2.4),
        ("unfortunately", -1.8), ("disappointed", -1.9), ("disappointing", -2.2),
        ("delay", -1.3), ("delayed", -0.9), ("complaint", -1.5), ("pain", -2.3),
        ("disease", -1.7), ("death", -2.9), ("harm", -2.5), ("fraud", -2.8),
        ("unable", -1.2), ("wrong", -2.1), ("reject", -1.7), ("rejected", -2.3),
        ("terminate", -1.2), ("terminated", -1.6), ("lawsuit", -1.8),
    ]
    .into_iter()
    .collect();

    static ref INTENSIFIERS: HashSet<&'static str> = [
        "very", "extremely", "highly", "really", "incredibly", "exceptionally",
        "remarkably", "particularly", "especially", "totally", "absolutely",
        "significantly", "substantially", "deeply",
    ]
    .into_iter()
    .collect();

    static ref DIMINISHERS: HashSet<&'static str> = [
        "slightly", "somewhat", "barely", "hardly", "marginally", "partly",
        "partially", "fairly", "rather",
    ]
    .into_iter()
    .collect();

    static ref NEGATIONS: HashSet<&'static str> = [
        "not", "no", "never", "none", "nobody", "nothing", "neither", "nor",
        "without", "cannot", "lack", "lacks", "lacking",
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// `Positive`, `Negative`, `Neutral`, or `Unknown` when scoring failed
    pub label: String,
    /// Normalized valence sum in [-1, 1]
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub confidence: f64,
}

impl Sentiment {
    pub fn unknown() -> Self {
        Self {
            label: "Unknown".to_string(),
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
            confidence: 0.0,
        }
    }
}

#[derive(Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, processor: &TextProcessor, text: &str) -> Result<Sentiment> {
        let cleaned = processor.clean_text(text);
        let words: Vec<String> = processor
            .words(&cleaned)
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        if words.is_empty() {
            return Err(AnalyzerError::TextProcessing(
                "No words to score for sentiment".to_string(),
            ));
        }

        let mut sum = 0.0;
        let mut positive_hits = 0usize;
        let mut negative_hits = 0usize;

        for (i, word) in words.iter().enumerate() {
            let Some(&base) = LEXICON.get(word.as_str()) else {
                continue;
            };

            let mut valence = base;

            if let Some(previous) = i.checked_sub(1).map(|p| words[p].as_str()) {
                if INTENSIFIERS.contains(previous) {
                    valence *= 1.5;
                } else if DIMINISHERS.contains(previous) {
                    valence *= 0.5;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if words[window_start..i].iter().any(|w| is_negation(w)) {
                valence *= NEGATION_SCALAR;
            }

            if valence > 0.0 {
                positive_hits += 1;
            } else if valence < 0.0 {
                negative_hits += 1;
            }
            sum += valence;
        }

        let compound = sum / (sum * sum + ALPHA).sqrt();
        let total = words.len() as f64;
        let positive = positive_hits as f64 / total;
        let negative = negative_hits as f64 / total;
        let neutral = (1.0 - positive - negative).max(0.0);

        let label = if compound >= LABEL_THRESHOLD {
            "Positive"
        } else if compound <= -LABEL_THRESHOLD {
            "Negative"
        } else {
            "Neutral"
        };

        let confidence = if label == "Neutral" { neutral } else { compound.abs() };

        Ok(Sentiment {
            label: label.to_string(),
            compound: round_to(compound, 3),
            positive: round_to(positive, 3),
            negative: round_to(negative, 3),
            neutral: round_to(neutral, 3),
            confidence: round_to(confidence, 3),
        })
    }
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(word) || word.ends_with("n't")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(text: &str) -> Sentiment {
        SentimentAnalyzer::new()
            .analyze(&TextProcessor::new(), text)
            .unwrap()
    }

    #[test]
    fn test_positive_text() {
        let sentiment = analyze("The service was excellent and the staff were wonderful.");
        assert_eq!(sentiment.label, "Positive");
        assert!(sentiment.compound > 0.5);
        assert!(sentiment.positive > 0.0);
        assert_eq!(sentiment.negative, 0.0);
    }

    #[test]
    fn test_negative_text() {
        let sentiment = analyze("This is a terrible, awful experience with constant errors.");
        assert_eq!(sentiment.label, "Negative");
        assert!(sentiment.compound < -0.5);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let sentiment = analyze("The outcome was not good.");
        assert_eq!(sentiment.label, "Negative");

        let contracted = analyze("The outcome wasn't good.");
        assert_eq!(contracted.label, "Negative");
    }

    #[test]
    fn test_intensifier_strengthens() {
        let plain = analyze("The results were good.");
        let boosted = analyze("The results were very good.");
        assert!(boosted.compound > plain.compound);
    }

    #[test]
    fn test_neutral_text() {
        let sentiment = analyze("The meeting is scheduled for Tuesday in room four.");
        assert_eq!(sentiment.label, "Neutral");
        assert_eq!(sentiment.compound, 0.0);
        assert_eq!(sentiment.neutral, 1.0);
    }

    #[test]
    fn test_no_words_is_an_error() {
        assert!(SentimentAnalyzer::new()
            .analyze(&TextProcessor::new(), "123 456 !!!")
            .is_err());
    }
}
