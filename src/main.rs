//! Keysift: keyword-based corpus search tool

mod cli;
mod config;
mod error;
mod input;
mod output;
mod processing;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::{Config, MatchPolicy, OutputFormat};
use error::{KeysiftError, Result};
use input::corpus::{to_document_map, CorpusLoader};
use log::{error, info};
use output::formatter::{save_report_to_file, ReportGenerator};
use output::report::{MatchReport, ScanInfo};
use processing::matcher::KeywordMatcher;
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Search {
            query,
            corpus,
            policy,
            all,
            detailed,
            output,
            save,
        } => {
            info!("Starting corpus search");

            if query.trim().is_empty() {
                return Err(KeysiftError::InvalidInput(
                    "Query must not be empty".to_string(),
                ));
            }

            // Parse output format, falling back to the configured default
            let output_format = match &output {
                Some(format) => {
                    cli::parse_output_format(format).map_err(KeysiftError::InvalidInput)?
                }
                None => config.output.format,
            };

            // CLI policy overrides the configured one
            let mut matching_config = config.matching.clone();
            if let Some(policy_str) = &policy {
                matching_config.policy =
                    MatchPolicy::parse(policy_str).map_err(KeysiftError::InvalidInput)?;
            }

            let detailed = detailed || config.output.detailed;

            let console_output = output_format == OutputFormat::Console;
            if console_output {
                println!("🔎 Searching for: \"{}\"", query);
                println!("📁 Corpus: {}", corpus.display());
                println!("🔧 Policy: {}", matching_config.policy.as_str());
                if detailed {
                    println!("📊 Detailed output enabled");
                }
            }

            let matcher = KeywordMatcher::from_config(&matching_config)?;

            let start = Instant::now();

            // Load the corpus
            if console_output {
                println!("\n📂 Loading corpus...");
            }
            let mut loader = CorpusLoader::new(&config.corpus)
                .with_progress(config.corpus.show_progress && console_output);
            let documents = loader.load_dir(&corpus).await?;
            if console_output {
                println!("📄 Loaded {} documents", documents.len());
            }

            // Match the query against every document
            let document_map = to_document_map(&documents);
            let results = matcher.filter_corpus(&query, &document_map);
            let query_tokens = matcher.normalize_query(&query);

            let report = MatchReport::from_match_results(
                &query,
                &query_tokens,
                &documents,
                &results,
                ScanInfo {
                    corpus_dir: corpus.display().to_string(),
                    policy: matching_config.policy,
                    processing_time_ms: start.elapsed().as_millis() as u64,
                },
            );

            let show_unmatched = all || detailed;
            let max_keywords = if detailed {
                usize::MAX
            } else {
                config.output.max_keywords_shown
            };

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                show_unmatched,
                max_keywords,
                true,
                true,
            );
            println!("{}", generator.generate_report(&report, &output_format)?);

            // Save without ANSI colors
            if let Some(save_path) = save {
                let file_generator =
                    ReportGenerator::with_options(false, show_unmatched, max_keywords, true, true);
                let content = file_generator.generate_report(&report, &output_format)?;
                save_report_to_file(&content, &save_path)?;
                println!("💾 Report saved to: {}", save_path.display());
            }

            if console_output {
                println!(
                    "🎯 Search complete! {} of {} documents matched",
                    report.summary.matched_documents, report.summary.total_documents
                );
            }
        }

        Commands::Keywords {
            file,
            limit,
            scores,
        } => {
            info!("Extracting keywords from a single document");

            cli::validate_file_extension(&file, &["pdf", "txt", "md"])
                .map_err(|e| KeysiftError::InvalidInput(format!("Document file: {}", e)))?;

            println!("🔤 Extracting keywords from: {}", file.display());

            let mut loader = CorpusLoader::new(&config.corpus).with_progress(false);
            let text = loader.extract_file(&file).await?;

            let matcher = KeywordMatcher::from_config(&config.matching)?;
            let phrases = matcher.extractor().extract(&text);

            if phrases.is_empty() {
                println!("⚠️  No keyword phrases found (document is empty or all stopwords)");
                return Ok(());
            }

            let shown = limit.unwrap_or(phrases.len());
            println!("\n📊 Top keyword phrases:");
            for (i, scored) in phrases.iter().take(shown).enumerate() {
                if scores {
                    println!("  {}. {} (score: {:.2})", i + 1, scored.phrase, scored.score);
                } else {
                    println!("  {}. {}", i + 1, scored.phrase);
                }
            }
            if phrases.len() > shown {
                println!("  ... and {} more phrases", phrases.len() - shown);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config file: {}", Config::config_path().display());
                println!("\nMatching:");
                println!("  Policy: {}", config.matching.policy.as_str());
                println!("  Fuzzy threshold: {:.2}", config.matching.fuzzy_threshold);
                if !config.matching.extra_stopwords.is_empty() {
                    println!(
                        "  Extra stopwords: {}",
                        config.matching.extra_stopwords.join(", ")
                    );
                }
                if let Some(path) = &config.matching.stopwords_file {
                    println!("  Stopwords file: {}", path.display());
                }
                println!("\nCorpus:");
                println!("  Extensions: {}", config.corpus.extensions.join(", "));
                println!("  Cache enabled: {}", config.corpus.enable_cache);
                println!("  Progress bar: {}", config.corpus.show_progress);
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Colors: {}", config.output.color_output);
                println!("  Max keywords shown: {}", config.output.max_keywords_shown);
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}
