//! Configuration management for the document analyzer

use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_upload_bytes: usize,
    pub allow_any_origin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Characters of extracted text fed into the analysis steps
    pub max_analysis_chars: usize,
    pub summary_sentences: usize,
    /// Sentences longer than this are only picked when nothing shorter is left
    pub max_sentence_words: usize,
    pub fallback_summary_chars: usize,
    pub max_keywords: usize,
    pub max_entities: usize,
    pub min_classification_hits: usize,
    pub words_per_minute: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub enabled: bool,
    pub backend: StorageBackend,
    pub bucket: Option<String>,
    pub region: String,
    /// Custom endpoint for S3-compatible services
    pub endpoint: Option<String>,
    pub local_dir: PathBuf,
    pub prefix: String,
    pub store_uploads: bool,
    pub store_results: bool,
    pub quota: QuotaConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
    Memory,
}

/// Conservative limits that keep usage inside typical free-tier allowances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub max_object_bytes: u64,
    pub max_total_bytes: u64,
    pub max_objects: u64,
    pub max_monthly_writes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            allow_any_origin: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_analysis_chars: 100_000,
            summary_sentences: 3,
            max_sentence_words: 40,
            fallback_summary_chars: 500,
            max_keywords: 10,
            max_entities: 25,
            min_classification_hits: 2,
            words_per_minute: 200.0,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let local_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("document-analyzer")
            .join("storage");

        Self {
            enabled: false,
            backend: StorageBackend::S3,
            bucket: None,
            region: "us-east-1".to_string(),
            endpoint: None,
            local_dir,
            prefix: "document-analyzer".to_string(),
            store_uploads: true,
            store_results: true,
            quota: QuotaConfig::default(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_object_bytes: 10 * 1024 * 1024,
            max_total_bytes: 1024 * 1024 * 1024,
            max_objects: 1_000,
            max_monthly_writes: 1_500,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AnalyzerError::Configuration(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AnalyzerError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AnalyzerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("document-analyzer")
            .join("config.toml")
    }

    /// Environment variables win over the config file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(bind) = std::env::var("DOC_ANALYZER_BIND") {
            if !bind.is_empty() {
                self.server.bind = bind;
            }
        }

        if let Ok(bucket) = std::env::var("DOC_ANALYZER_STORAGE_BUCKET") {
            if !bucket.is_empty() {
                self.storage.bucket = Some(bucket);
                self.storage.enabled = true;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.summary_sentences == 0 {
            return Err(AnalyzerError::Configuration(
                "analysis.summary_sentences must be at least 1".to_string(),
            ));
        }

        if self.analysis.max_analysis_chars == 0 {
            return Err(AnalyzerError::Configuration(
                "analysis.max_analysis_chars must be greater than zero".to_string(),
            ));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(AnalyzerError::Configuration(
                "server.max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        if self.storage.enabled
            && self.storage.backend == StorageBackend::S3
            && self.storage.bucket.as_deref().map_or(true, str::is_empty)
        {
            return Err(AnalyzerError::Configuration(
                "storage.bucket is required for the s3 backend".to_string(),
            ));
        }

        Ok(())
    }
}
