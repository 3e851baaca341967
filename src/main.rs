//! Document analyzer: PDF text extraction and heuristic NLP analysis

use clap::Parser;
use document_analyzer::analysis::AnalysisEngine;
use document_analyzer::cli::{self, Cli, Commands, ConfigAction};
use document_analyzer::config::Config;
use document_analyzer::error::{AnalyzerError, Result};
use document_analyzer::input::InputManager;
use document_analyzer::output::formatter::{save_report_to_file, ReportGenerator};
use document_analyzer::server;
use document_analyzer::storage::StorageManager;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            info!("Starting document analyzer server on {}", config.server.bind);
            server::serve(&config).await?;
        }

        Commands::Analyze {
            file,
            output,
            save,
            store,
        } => {
            cli::validate_file_extension(&file, &["pdf", "txt", "md", "markdown"])
                .map_err(AnalyzerError::InvalidInput)?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(AnalyzerError::InvalidInput)?,
                None => config.output.format.clone(),
            };

            let storage = if store {
                if !config.storage.enabled {
                    return Err(AnalyzerError::Configuration(
                        "--store requires storage.enabled = true in the configuration".to_string(),
                    ));
                }
                Some(StorageManager::connect(&config.storage).await?)
            } else {
                None
            };

            let spinner = spinner(&format!("Extracting text from {}", file.display()));

            let mut input_manager = InputManager::new();
            let text = input_manager.extract_text(&file).await?;

            spinner.set_message(format!("Analyzing {} characters", text.chars().count()));
            let engine = AnalysisEngine::new(&config.analysis)?;
            let source_name = file.to_string_lossy().to_string();
            let mut report = engine.analyze(&text, &source_name)?;
            if report.is_degraded() {
                warn!(
                    "Some analysis steps fell back to defaults: {}",
                    report.metadata.degraded_steps.join(", ")
                );
            }

            if let Some(storage) = &storage {
                spinner.set_message("Persisting to storage");
                let upload = tokio::fs::read(&file).await?;
                storage.persist(Some(upload), &mut report).await;
            }
            spinner.finish_and_clear();

            let save = cli::resolve_save_path(save, &output_format, &file);

            // Colors never go to files
            let use_colors = save.is_none() && config.output.color_output;
            let rendered = ReportGenerator::with_options(use_colors, config.output.pretty_json, true)
                .generate_report(&report, &output_format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| AnalyzerError::Configuration(e.to_string()))?;
                println!("{}", content);
            }
            Some(ConfigAction::Reset) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("Configuration reset to defaults at {}", path.display());
            }
            Some(ConfigAction::Path) => {
                let path = config_path.unwrap_or_else(Config::config_path);
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
