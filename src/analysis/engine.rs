//! Analysis engine running every step over one document

use crate::analysis::classifier::{Classification, DocumentClassifier};
use crate::analysis::entities::EntityExtractor;
use crate::analysis::keywords::KeywordExtractor;
use crate::analysis::readability::{self, Readability};
use crate::analysis::sentiment::{Sentiment, SentimentAnalyzer};
use crate::analysis::statistics::StatisticsCollector;
use crate::analysis::summarizer::Summarizer;
use crate::analysis::text_processor::{truncate_chars, TextProcessor};
use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};
use crate::output::report::{AnalysisReport, ReportMetadata};
use chrono::Utc;
use std::time::Instant;

/// Coordinates the text processor and all analysis components.
///
/// The engine holds no per-request state and can be shared across threads.
pub struct AnalysisEngine {
    processor: TextProcessor,
    summarizer: Summarizer,
    entities: EntityExtractor,
    keywords: KeywordExtractor,
    sentiment: SentimentAnalyzer,
    classifier: DocumentClassifier,
    statistics: StatisticsCollector,
    max_chars: usize,
}

impl AnalysisEngine {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            processor: TextProcessor::new(),
            summarizer: Summarizer::new(config),
            entities: EntityExtractor::new(config),
            keywords: KeywordExtractor::new(config),
            sentiment: SentimentAnalyzer::new(),
            classifier: DocumentClassifier::new(config)?,
            statistics: StatisticsCollector::new(config.words_per_minute),
            max_chars: config.max_analysis_chars,
        })
    }

    /// Analyze `text` and build the full report.
    ///
    /// Only empty input is an error. A failing step is logged and replaced by
    /// its default, and its name is listed in `metadata.degraded_steps`.
    pub fn analyze(&self, text: &str, source_name: &str) -> Result<AnalysisReport> {
        let start_time = Instant::now();

        if text.trim().is_empty() {
            return Err(AnalyzerError::EmptyText);
        }

        let extracted_chars = text.chars().count();
        let text = truncate_chars(text, self.max_chars);
        if extracted_chars > self.max_chars {
            log::debug!(
                "Truncated {} from {} to {} characters",
                source_name,
                extracted_chars,
                self.max_chars
            );
        }

        let mut degraded = Vec::new();

        let summary = match self.summarizer.summarize(&self.processor, text) {
            Ok(summary) => summary,
            Err(e) => {
                log::warn!("Summarization failed for {}: {}", source_name, e);
                degraded.push("summary".to_string());
                self.summarizer.fallback(text)
            }
        };

        let entities = recover(
            "entities",
            source_name,
            &mut degraded,
            self.entities.extract(&self.processor, text),
            Vec::new,
        );

        let keywords = recover(
            "keywords",
            source_name,
            &mut degraded,
            self.keywords.extract(&self.processor, text),
            Vec::new,
        );

        let sentiment = recover(
            "sentiment",
            source_name,
            &mut degraded,
            self.sentiment.analyze(&self.processor, text),
            Sentiment::unknown,
        );

        let classification = recover(
            "classification",
            source_name,
            &mut degraded,
            self.classifier.classify(text),
            Classification::unknown,
        );

        let readability = recover(
            "readability",
            source_name,
            &mut degraded,
            readability::analyze(&self.processor, text),
            Readability::unknown,
        );

        let statistics = self.statistics.collect(&self.processor, text, extracted_chars);

        let processing_time = start_time.elapsed();
        log::info!(
            "Analyzed {} ({} words) in {}ms",
            source_name,
            statistics.word_count,
            processing_time.as_millis()
        );

        Ok(AnalysisReport {
            summary,
            entities,
            keywords,
            sentiment,
            classification,
            readability,
            statistics,
            metadata: ReportMetadata {
                source_name: source_name.to_string(),
                analyzed_at: Utc::now(),
                processing_time_ms: processing_time.as_millis() as u64,
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                degraded_steps: degraded,
                storage: None,
            },
        })
    }
}

fn recover<T>(
    step: &str,
    source_name: &str,
    degraded: &mut Vec<String>,
    result: Result<T>,
    default: impl FnOnce() -> T,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} step failed for {}: {}", step, source_name, e);
            degraded.push(step.to_string());
            default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(&AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_full_report() {
        let text = "This Agreement is made between Acme Corporation and Globex Ltd. \
                    The parties agree that the contract is governed by the laws of California. \
                    Any breach of this agreement will be resolved by arbitration in London. \
                    Payment of $10,000 is due on March 1, 2024.";

        let report = engine().analyze(text, "agreement.pdf").unwrap();

        assert_eq!(report.classification.document_type, "Legal Document");
        assert!(!report.summary.is_empty());
        assert!(report.entities.iter().any(|e| e.entity_group == "ORG"));
        assert!(report.entities.iter().any(|e| e.entity_group == "MONEY"));
        assert!(report.keywords.iter().any(|k| k.keyword == "agreement"));
        assert!(report.statistics.word_count > 30);
        assert!(!report.statistics.truncated);
        assert_eq!(report.metadata.source_name, "agreement.pdf");
        assert!(report.metadata.degraded_steps.is_empty());
        assert!(report.metadata.storage.is_none());
    }

    #[test]
    fn test_short_text_summary_is_unchanged() {
        let text = "One sentence here. Another sentence there. A third one ends it.";
        let report = engine().analyze(text, "short.txt").unwrap();
        assert_eq!(report.summary, text);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let result = engine().analyze("   \n\t ", "blank.pdf");
        assert!(matches!(result, Err(AnalyzerError::EmptyText)));
    }

    #[test]
    fn test_truncation() {
        let engine = AnalysisEngine::new(&AnalysisConfig {
            max_analysis_chars: 20,
            ..AnalysisConfig::default()
        })
        .unwrap();

        let report = engine
            .analyze("The quick brown fox jumps over the lazy dog again.", "fox.txt")
            .unwrap();

        assert!(report.statistics.truncated);
        assert_eq!(report.statistics.analyzed_characters, 20);
        assert_eq!(report.statistics.extracted_characters, 50);
    }

    #[test]
    fn test_failing_steps_degrade_instead_of_failing() {
        // Digits only: no words to score, no sentences to rate
        let report = engine().analyze("12345 67890", "numbers.txt").unwrap();

        assert_eq!(report.sentiment, Sentiment::unknown());
        assert_eq!(report.readability, Readability::unknown());
        assert!(report.keywords.is_empty());
        assert!(report.metadata.degraded_steps.contains(&"sentiment".to_string()));
        assert!(report.metadata.degraded_steps.contains(&"readability".to_string()));
        assert!(report.is_degraded());
    }
}
