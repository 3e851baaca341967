//! CLI interface for the document analyzer

use crate::config::OutputFormat;
use crate::output::formatter::suggest_filename;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "document-analyzer")]
#[command(about = "PDF text extraction and document analysis service")]
#[command(long_about = "Extract text from PDF, TXT and Markdown documents and report a summary, entities, keywords, sentiment, document type, readability and statistics, from the command line or over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8000
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze a local document
    Analyze {
        /// Path to the document (PDF, TXT, MD)
        file: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file; without a path, name it after the document
        #[arg(short, long, num_args = 0..=1)]
        save: Option<Option<PathBuf>>,

        /// Persist the document and report to the configured storage
        #[arg(long)]
        store: bool,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

/// Where `--save` should write, if anywhere
pub fn resolve_save_path(save: Option<Option<PathBuf>>, format: &OutputFormat, source: &Path) -> Option<PathBuf> {
    save.map(|path| {
        path.unwrap_or_else(|| PathBuf::from(suggest_filename(format, &source.to_string_lossy(), true)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pdf", "txt", "md"];
        assert!(validate_file_extension(Path::new("report.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("image.png"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("README"), &allowed).is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::parse_from([
            "document-analyzer",
            "--verbose",
            "analyze",
            "contract.pdf",
            "--output",
            "json",
            "--store",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { file, output, save, store } => {
                assert_eq!(file, PathBuf::from("contract.pdf"));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(save.is_none());
                assert!(store);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_cli_parses_serve_with_bind() {
        let cli = Cli::parse_from(["document-analyzer", "serve", "--bind", "127.0.0.1:9000"]);
        assert!(matches!(
            cli.command,
            Commands::Serve { bind: Some(ref b) } if b == "127.0.0.1:9000"
        ));
    }

    #[test]
    fn test_save_without_path_uses_document_name() {
        let cli = Cli::parse_from(["document-analyzer", "analyze", "reports/q3.pdf", "--save"]);
        let save = match cli.command {
            Commands::Analyze { save, .. } => save,
            _ => panic!("expected analyze command"),
        };
        assert_eq!(save, Some(None));

        let path = resolve_save_path(save, &OutputFormat::Markdown, Path::new("reports/q3.pdf")).unwrap();
        let name = path.to_string_lossy();
        assert!(name.starts_with("q3_analysis_"));
        assert!(name.ends_with(".md"));
    }

    #[test]
    fn test_save_with_explicit_path() {
        let save = Some(Some(PathBuf::from("out/report.json")));
        assert_eq!(
            resolve_save_path(save, &OutputFormat::Json, Path::new("a.pdf")),
            Some(PathBuf::from("out/report.json"))
        );
        assert_eq!(resolve_save_path(None, &OutputFormat::Json, Path::new("a.pdf")), None);
    }
}
