//! Configuration management for keysift

use crate::error::{KeysiftError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub matching: MatchingConfig,
    pub corpus: CorpusConfig,
    pub output: OutputConfig,
}

/// Settings consumed by the keyword matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// How query tokens are compared against keyword phrases.
    pub policy: MatchPolicy,
    /// Similarity threshold for the fuzzy policy (0.0 to 1.0).
    pub fuzzy_threshold: f32,
    /// Words appended to the built-in English stopword list.
    pub extra_stopwords: Vec<String>,
    /// Optional file replacing the built-in stopword list entirely
    /// (one word per line, `#` starts a comment).
    pub stopwords_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// A token matches if it is a case-insensitive substring of a phrase.
    Substring,
    /// A token matches if it equals one of a phrase's words.
    ExactToken,
    /// A token matches if it is similar enough to one of a phrase's words.
    Fuzzy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// File extensions eligible for the corpus scan.
    pub extensions: Vec<String>,
    pub enable_cache: bool,
    pub show_progress: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".to_string(), "md".to_string(), "pdf".to_string()],
            enable_cache: true,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    /// Maximum keyword phrases printed per document on the console.
    pub max_keywords_shown: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                policy: MatchPolicy::Substring,
                fuzzy_threshold: 0.8,
                extra_stopwords: Vec::new(),
                stopwords_file: None,
            },
            corpus: CorpusConfig {
                extensions: vec!["txt".to_string(), "md".to_string(), "pdf".to_string()],
                enable_cache: true,
                show_progress: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                max_keywords_shown: 5,
            },
        }
    }
}

impl Config {
    /// Load from the default location, creating the file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load from an explicit path (the CLI `--config` override).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| KeysiftError::Configuration(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| KeysiftError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("keysift")
            .join("config.toml")
    }
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Substring => "substring",
            MatchPolicy::ExactToken => "exact-token",
            MatchPolicy::Fuzzy => "fuzzy",
        }
    }

    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "substring" => Ok(MatchPolicy::Substring),
            "exact-token" | "exact" => Ok(MatchPolicy::ExactToken),
            "fuzzy" => Ok(MatchPolicy::Fuzzy),
            _ => Err(format!(
                "Invalid match policy: {}. Supported: substring, exact-token, fuzzy",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.matching.policy, MatchPolicy::Substring);
        assert_eq!(config.matching.fuzzy_threshold, 0.8);
        assert!(config.matching.extra_stopwords.is_empty());
        assert!(config.corpus.extensions.contains(&"txt".to_string()));
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.matching.policy, config.matching.policy);
        assert_eq!(parsed.corpus.extensions, config.corpus.extensions);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(MatchPolicy::parse("substring").unwrap(), MatchPolicy::Substring);
        assert_eq!(MatchPolicy::parse("EXACT-TOKEN").unwrap(), MatchPolicy::ExactToken);
        assert_eq!(MatchPolicy::parse("fuzzy").unwrap(), MatchPolicy::Fuzzy);
        assert!(MatchPolicy::parse("semantic").is_err());
    }

    #[test]
    fn test_policy_from_toml_kebab_case() {
        let toml_str = r#"
            policy = "exact-token"
            fuzzy_threshold = 0.9
            extra_stopwords = ["lorem"]
        "#;
        let matching: MatchingConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(matching.policy, MatchPolicy::ExactToken);
        assert_eq!(matching.fuzzy_threshold, 0.9);
        assert_eq!(matching.extra_stopwords, vec!["lorem".to_string()]);
    }
}
