//! CLI interface for keysift

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keysift")]
#[command(about = "Keyword-based corpus search tool")]
#[command(long_about = "Match free-form queries against a directory of documents using automatic keyword extraction")]
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
    /// Search a corpus directory for documents relevant to a query
    Search {
        /// Free-form query, e.g. "machine learning basics"
        query: String,

        /// Corpus directory to scan (TXT, MD, PDF files)
        #[arg(short = 'd', long, default_value = "corpus")]
        corpus: PathBuf,

        /// Match policy: substring, exact-token, fuzzy
        #[arg(short, long)]
        policy: Option<String>,

        /// Include unmatched documents in console output
        #[arg(long)]
        all: bool,

        /// Output detailed analysis
        #[arg(long)]
        detailed: bool,

        /// Output format: console, json, markdown (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Extract keyword phrases from a single document
    Keywords {
        /// Path to the document (PDF, TXT, MD)
        file: PathBuf,

        /// Show only the top N phrases
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show phrase scores
        #[arg(short, long)]
        scores: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
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
