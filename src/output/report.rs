//! Report structures returned by the analysis engine

use crate::analysis::classifier::Classification;
use crate::analysis::entities::Entity;
use crate::analysis::keywords::Keyword;
use crate::analysis::readability::Readability;
use crate::analysis::sentiment::Sentiment;
use crate::analysis::statistics::TextStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full analysis of a single document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Extractive summary built from the highest scoring sentences
    pub summary: String,

    /// Named entities grouped by label and surface form
    pub entities: Vec<Entity>,

    /// Ranked content words
    pub keywords: Vec<Keyword>,

    pub sentiment: Sentiment,

    /// Best matching document type with runner-up alternatives
    pub classification: Classification,

    pub readability: Readability,

    pub statistics: TextStatistics,

    /// Provenance and timing
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// File name or path the text came from
    pub source_name: String,

    pub analyzed_at: DateTime<Utc>,

    pub processing_time_ms: u64,

    pub engine_version: String,

    /// Steps that failed and fell back to their default result
    pub degraded_steps: Vec<String>,

    /// Outcome of persisting the upload and the report, when storage is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageReceipt>,
}

/// What the storage layer did with a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageReceipt {
    pub upload_key: Option<String>,
    pub result_key: Option<String>,
    /// Reasons for writes that were skipped or failed
    pub skipped: Vec<String>,
}

impl AnalysisReport {
    pub fn is_degraded(&self) -> bool {
        !self.metadata.degraded_steps.is_empty()
    }
}
