//! Error handling for the document analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("No text could be extracted from the document")]
    EmptyText,

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Upload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Convert object store errors to our custom error type
impl From<object_store::Error> for AnalyzerError {
    fn from(err: object_store::Error) -> Self {
        AnalyzerError::Storage(err.to_string())
    }
}

impl AnalyzerError {
    /// True for failures caused by the caller's input rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::EmptyText
                | AnalyzerError::UnsupportedFormat(_)
                | AnalyzerError::PayloadTooLarge { .. }
                | AnalyzerError::InvalidInput(_)
        )
    }
}
