//! File type detection

use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, PartialEq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Detect from a file name or path; names without an extension are unknown
    pub fn from_name(name: &str) -> Self {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

/// Returns true if the bytes start with the PDF header.
/// Some producers emit a few junk bytes first, so the header may appear
/// anywhere in the first 1024 bytes.
pub fn is_pdf(head: &[u8]) -> bool {
    let window = &head[..head.len().min(1024)];
    window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_detection() {
        assert_eq!(FileType::from_name("report.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_name("notes.md"), FileType::Markdown);
        assert_eq!(FileType::from_name("notes.txt"), FileType::Text);
        assert_eq!(FileType::from_name("archive.tar.gz"), FileType::Unknown);
        assert_eq!(FileType::from_name("README"), FileType::Unknown);
    }

    #[test]
    fn test_pdf_magic() {
        assert!(is_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"));
        assert!(is_pdf(b"\xef\xbb\xbf%PDF-1.4"));
        assert!(!is_pdf(b"PK\x03\x04"));
        assert!(!is_pdf(b""));
    }
}
