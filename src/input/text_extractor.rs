//! Text extraction from PDF, plain text and markdown sources

use crate::error::{AnalyzerError, Result};
use lazy_static::lazy_static;
use log::debug;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::path::Path;
use tokio::fs;

lazy_static! {
    static ref BLANK_RUNS: Regex = Regex::new(r"\n[ \t]*(?:\n[ \t]*){2,}").expect("BLANK_RUNS regex is valid");
    static ref TRAILING_SPACE: Regex = Regex::new(r"[ \t]+\n").expect("TRAILING_SPACE regex is valid");
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        extract_pdf_bytes(bytes).await.map_err(|e| match e {
            AnalyzerError::PdfExtraction(msg) => {
                AnalyzerError::PdfExtraction(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Extract text from an in-memory PDF on a blocking thread.
///
/// `pdf-extract` can panic on malformed documents; running it through
/// `spawn_blocking` turns such a panic into a regular extraction error.
pub async fn extract_pdf_bytes(bytes: Vec<u8>) -> Result<String> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AnalyzerError::PdfExtraction("PDF parser failed on malformed document".to_string())
            } else {
                AnalyzerError::PdfExtraction(format!("Extraction task failed: {}", e))
            }
        })??;

    debug!("Extracted {} characters from {} byte PDF", text.len(), size);
    Ok(text)
}

/// Synchronous PDF text extraction with layout cleanup
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AnalyzerError::PdfExtraction(format!("Failed to extract text from PDF: {}", e)))?;

    Ok(clean_layout(&raw))
}

/// Drop trailing spaces and collapse runs of blank lines to one blank line
fn clean_layout(raw: &str) -> String {
    let text = raw.replace('\r', "").replace('\u{000C}', "\n");
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Render markdown down to its text content, one block per line
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak
            | Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => {
                if !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_text_strips_formatting() {
        let text = markdown_to_text("# Title\n\nSome **bold** and `code` text.\n\n- item one\n- item two\n");
        assert_eq!(text, "Title\nSome bold and code text.\nitem one\nitem two");
    }

    #[test]
    fn test_clean_layout_collapses_blank_lines() {
        let cleaned = clean_layout("First line   \n\n\n\n\nSecond line\r\n\u{000C}Third");
        assert_eq!(cleaned, "First line\n\nSecond line\n\nThird");
    }

    #[test]
    fn test_invalid_pdf_bytes_error() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(matches!(result, Err(AnalyzerError::PdfExtraction(_))));
    }
}
