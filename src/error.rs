//! Error handling for the keysift application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeysiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corpus directory not found: {0}")]
    CorpusNotFound(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, KeysiftError>;
