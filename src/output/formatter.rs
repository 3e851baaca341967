//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{AnalyzerError, Result};
use crate::output::report::AnalysisReport;
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::Path;

/// Trait for rendering an analysis report
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Terminal formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter, the same shape the HTTP API returns under `data`
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the configured formatter
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".blue().bold(), title.blue().bold())
        } else {
            format!("\n▓ {}\n", title)
        }
    }

    fn sentiment_color(label: &str) -> Color {
        match label {
            "Positive" => Color::Green,
            "Negative" => Color::Red,
            "Neutral" => Color::Yellow,
            _ => Color::White,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();
        let fmt_err = |e: std::fmt::Error| AnalyzerError::OutputFormatting(e.to_string());

        let title = format!("Document Analysis: {}", report.metadata.source_name);
        if self.use_colors {
            writeln!(out, "{}", title.bold()).map_err(fmt_err)?;
        } else {
            writeln!(out, "{}", title).map_err(fmt_err)?;
        }

        out.push_str(&self.format_header("Summary"));
        writeln!(out, "{}", report.summary).map_err(fmt_err)?;

        out.push_str(&self.format_header("Classification"));
        writeln!(
            out,
            "  Type: {} ({:.1}% confidence)",
            self.colorize(&report.classification.document_type, Color::Cyan),
            report.classification.confidence * 100.0
        )
        .map_err(fmt_err)?;
        for alternative in &report.classification.alternatives {
            writeln!(
                out,
                "  Also possible: {} ({:.1}%)",
                alternative.document_type,
                alternative.confidence * 100.0
            )
            .map_err(fmt_err)?;
        }

        out.push_str(&self.format_header("Sentiment"));
        let sentiment = &report.sentiment;
        writeln!(
            out,
            "  {} (compound {:.3}, confidence {:.3})",
            self.colorize(&sentiment.label, Self::sentiment_color(&sentiment.label)),
            sentiment.compound,
            sentiment.confidence
        )
        .map_err(fmt_err)?;
        writeln!(
            out,
            "  positive {:.3} | negative {:.3} | neutral {:.3}",
            sentiment.positive, sentiment.negative, sentiment.neutral
        )
        .map_err(fmt_err)?;

        out.push_str(&self.format_header("Keywords"));
        if report.keywords.is_empty() {
            writeln!(out, "  (none)").map_err(fmt_err)?;
        }
        for (i, keyword) in report.keywords.iter().enumerate() {
            writeln!(
                out,
                "  {}. {} (x{}, score {:.4})",
                i + 1,
                self.colorize(&keyword.keyword, Color::Green),
                keyword.count,
                keyword.score
            )
            .map_err(fmt_err)?;
        }

        out.push_str(&self.format_header("Entities"));
        if report.entities.is_empty() {
            writeln!(out, "  (none)").map_err(fmt_err)?;
        }
        for entity in &report.entities {
            writeln!(
                out,
                "  [{}] {} (x{}, score {:.3})",
                self.colorize(&entity.entity_group, Color::Magenta),
                entity.word,
                entity.count,
                entity.score
            )
            .map_err(fmt_err)?;
        }

        out.push_str(&self.format_header("Readability"));
        let readability = &report.readability;
        writeln!(out, "  Reading level: {}", readability.reading_level).map_err(fmt_err)?;
        writeln!(out, "  Flesch reading ease: {:.2}", readability.flesch_reading_ease).map_err(fmt_err)?;
        writeln!(out, "  Flesch-Kincaid grade: {:.2}", readability.flesch_kincaid_grade).map_err(fmt_err)?;
        writeln!(out, "  Gunning fog: {:.2}", readability.gunning_fog).map_err(fmt_err)?;
        writeln!(out, "  SMOG: {:.2}", readability.smog_index).map_err(fmt_err)?;
        writeln!(out, "  Coleman-Liau: {:.2}", readability.coleman_liau_index).map_err(fmt_err)?;
        writeln!(out, "  ARI: {:.2}", readability.automated_readability_index).map_err(fmt_err)?;

        out.push_str(&self.format_header("Statistics"));
        let stats = &report.statistics;
        writeln!(
            out,
            "  {} words, {} sentences, {} paragraphs",
            stats.word_count, stats.sentence_count, stats.paragraph_count
        )
        .map_err(fmt_err)?;
        writeln!(
            out,
            "  {} unique words (lexical diversity {:.3})",
            stats.unique_words, stats.lexical_diversity
        )
        .map_err(fmt_err)?;
        writeln!(
            out,
            "  avg word length {:.2}, avg sentence length {:.2} words",
            stats.average_word_length, stats.average_sentence_length
        )
        .map_err(fmt_err)?;
        writeln!(out, "  ~{:.1} min reading time", stats.reading_time_minutes).map_err(fmt_err)?;
        if stats.truncated {
            writeln!(
                out,
                "  {}",
                self.colorize(
                    &format!(
                        "Analyzed first {} of {} characters",
                        stats.analyzed_characters, stats.extracted_characters
                    ),
                    Color::Yellow
                )
            )
            .map_err(fmt_err)?;
        }

        if !report.metadata.degraded_steps.is_empty() {
            writeln!(
                out,
                "\n{} {}",
                self.colorize("Degraded steps:", Color::Yellow),
                report.metadata.degraded_steps.join(", ")
            )
            .map_err(fmt_err)?;
        }

        if let Some(receipt) = &report.metadata.storage {
            out.push_str(&self.format_header("Storage"));
            if let Some(key) = &receipt.upload_key {
                writeln!(out, "  Upload: {}", key).map_err(fmt_err)?;
            }
            if let Some(key) = &receipt.result_key {
                writeln!(out, "  Result: {}", key).map_err(fmt_err)?;
            }
            for reason in &receipt.skipped {
                writeln!(out, "  Skipped: {}", self.colorize(reason, Color::Yellow)).map_err(fmt_err)?;
            }
        }

        writeln!(
            out,
            "\nAnalyzed in {}ms (engine v{})",
            report.metadata.processing_time_ms, report.metadata.engine_version
        )
        .map_err(fmt_err)?;

        Ok(out)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut md = String::new();
        let fmt_err = |e: std::fmt::Error| AnalyzerError::OutputFormatting(e.to_string());

        writeln!(md, "# Document Analysis: {}\n", report.metadata.source_name).map_err(fmt_err)?;

        writeln!(md, "## Summary\n\n{}\n", report.summary).map_err(fmt_err)?;

        writeln!(md, "## Classification\n").map_err(fmt_err)?;
        writeln!(
            md,
            "**{}** ({:.1}% confidence)\n",
            report.classification.document_type,
            report.classification.confidence * 100.0
        )
        .map_err(fmt_err)?;
        for alternative in &report.classification.alternatives {
            writeln!(
                md,
                "- {} ({:.1}%)",
                alternative.document_type,
                alternative.confidence * 100.0
            )
            .map_err(fmt_err)?;
        }
        if !report.classification.alternatives.is_empty() {
            md.push('\n');
        }

        let sentiment = &report.sentiment;
        writeln!(md, "## Sentiment\n").map_err(fmt_err)?;
        writeln!(
            md,
            "**{}** (compound {:.3}, positive {:.3}, negative {:.3}, neutral {:.3})\n",
            sentiment.label,
            sentiment.compound,
            sentiment.positive,
            sentiment.negative,
            sentiment.neutral
        )
        .map_err(fmt_err)?;

        writeln!(md, "## Keywords\n").map_err(fmt_err)?;
        writeln!(md, "| Keyword | Count | Score |\n|---|---|---|").map_err(fmt_err)?;
        for keyword in &report.keywords {
            writeln!(md, "| {} | {} | {:.4} |", keyword.keyword, keyword.count, keyword.score)
                .map_err(fmt_err)?;
        }
        md.push('\n');

        writeln!(md, "## Entities\n").map_err(fmt_err)?;
        writeln!(md, "| Entity | Group | Count | Score |\n|---|---|---|---|").map_err(fmt_err)?;
        for entity in &report.entities {
            writeln!(
                md,
                "| {} | {} | {} | {:.3} |",
                Self::escape_cell(&entity.word),
                entity.entity_group,
                entity.count,
                entity.score
            )
            .map_err(fmt_err)?;
        }
        md.push('\n');

        let readability = &report.readability;
        writeln!(md, "## Readability\n").map_err(fmt_err)?;
        writeln!(md, "| Metric | Value |\n|---|---|").map_err(fmt_err)?;
        writeln!(md, "| Reading level | {} |", readability.reading_level).map_err(fmt_err)?;
        writeln!(md, "| Flesch reading ease | {:.2} |", readability.flesch_reading_ease).map_err(fmt_err)?;
        writeln!(md, "| Flesch-Kincaid grade | {:.2} |", readability.flesch_kincaid_grade).map_err(fmt_err)?;
        writeln!(md, "| Gunning fog | {:.2} |", readability.gunning_fog).map_err(fmt_err)?;
        writeln!(md, "| SMOG | {:.2} |", readability.smog_index).map_err(fmt_err)?;
        writeln!(md, "| Coleman-Liau | {:.2} |", readability.coleman_liau_index).map_err(fmt_err)?;
        writeln!(md, "| ARI | {:.2} |\n", readability.automated_readability_index).map_err(fmt_err)?;

        let stats = &report.statistics;
        writeln!(md, "## Statistics\n").map_err(fmt_err)?;
        writeln!(md, "- Words: {}", stats.word_count).map_err(fmt_err)?;
        writeln!(md, "- Sentences: {}", stats.sentence_count).map_err(fmt_err)?;
        writeln!(md, "- Paragraphs: {}", stats.paragraph_count).map_err(fmt_err)?;
        writeln!(md, "- Unique words: {}", stats.unique_words).map_err(fmt_err)?;
        writeln!(md, "- Lexical diversity: {:.3}", stats.lexical_diversity).map_err(fmt_err)?;
        writeln!(md, "- Reading time: {:.1} min", stats.reading_time_minutes).map_err(fmt_err)?;
        if stats.truncated {
            writeln!(
                md,
                "- Truncated: analyzed {} of {} characters",
                stats.analyzed_characters, stats.extracted_characters
            )
            .map_err(fmt_err)?;
        }

        if self.include_metadata {
            let meta = &report.metadata;
            writeln!(md, "\n---\n").map_err(fmt_err)?;
            writeln!(
                md,
                "_Analyzed {} in {}ms by document-analyzer v{}_",
                meta.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
                meta.processing_time_ms,
                meta.engine_version
            )
            .map_err(fmt_err)?;
            if !meta.degraded_steps.is_empty() {
                writeln!(md, "\n_Degraded steps: {}_", meta.degraded_steps.join(", ")).map_err(fmt_err)?;
            }
        }

        Ok(md)
    }
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, source_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(source_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}
