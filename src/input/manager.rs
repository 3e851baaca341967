//! Input manager for handling different file types

use crate::error::{AnalyzerError, Result};
use crate::input::file_detector::{is_pdf, FileType};
use crate::input::text_extractor::{
    extract_pdf_bytes, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract text from a file on disk, routing by extension
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(AnalyzerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_name(&path_str);

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(AnalyzerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extract text from an uploaded PDF held in memory.
    ///
    /// The name must carry a `.pdf` extension and the bytes must start with
    /// the PDF header. Uploads are never cached.
    pub async fn extract_uploaded_pdf(&self, name: &str, bytes: Vec<u8>) -> Result<String> {
        if FileType::from_name(name) != FileType::Pdf {
            return Err(AnalyzerError::UnsupportedFormat(
                "Only PDF files are supported".to_string(),
            ));
        }

        if !is_pdf(&bytes) {
            return Err(AnalyzerError::InvalidInput(
                "File content is not a valid PDF".to_string(),
            ));
        }

        info!("Extracting text from uploaded PDF: {} ({} bytes)", name, bytes.len());
        extract_pdf_bytes(bytes).await
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
