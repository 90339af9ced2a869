//! Keysift library: keyword extraction and corpus matching

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::{Config, MatchPolicy};
pub use error::{KeysiftError, Result};
pub use processing::matcher::{DocumentMatch, KeywordMatcher, MatchMap};
pub use processing::rake::RakeExtractor;
pub use processing::stopwords::StopwordSet;
