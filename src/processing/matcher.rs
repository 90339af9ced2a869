//! Query-to-corpus keyword matching

use crate::config::{MatchPolicy, MatchingConfig};
use crate::error::Result;
use crate::processing::rake::RakeExtractor;
use crate::processing::stopwords::StopwordSet;
use aho_corasick::AhoCorasick;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use strsim::jaro_winkler;
use unicode_segmentation::UnicodeSegmentation;

/// Match decision and keyword evidence for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMatch {
    /// Ranked keyword phrases extracted from the document, best first.
    pub keywords: Vec<String>,
    /// Whether any query token matched any keyword phrase.
    pub matched: bool,
}

/// Match results keyed by document identifier. A `BTreeMap` keeps
/// iteration order deterministic for serialization and tests.
pub type MatchMap = BTreeMap<String, DocumentMatch>;

/// Decides which documents in a corpus are relevant to a query.
///
/// The matcher is pure and stateless across calls: it holds only its
/// configuration (stopwords, match policy, fuzzy threshold), so separate
/// instances with different stopword sets can run side by side.
pub struct KeywordMatcher {
    stopwords: StopwordSet,
    extractor: RakeExtractor,
    policy: MatchPolicy,
    fuzzy_threshold: f32,
}

/// Query state shared across the documents of one corpus scan.
struct PreparedQuery {
    tokens: HashSet<String>,
    /// Automaton over the tokens, built once per query for the substring
    /// policy so each phrase is scanned in a single pass.
    automaton: Option<AhoCorasick>,
}

impl KeywordMatcher {
    pub fn new(stopwords: StopwordSet) -> Self {
        let extractor = RakeExtractor::new(stopwords.clone());
        Self {
            stopwords,
            extractor,
            policy: MatchPolicy::Substring,
            fuzzy_threshold: 0.8,
        }
    }

    /// Build a matcher from the `[matching]` configuration table.
    pub fn from_config(config: &MatchingConfig) -> Result<Self> {
        let stopwords = match &config.stopwords_file {
            Some(path) => StopwordSet::from_file(path)?,
            None => StopwordSet::with_extra(&config.extra_stopwords),
        };

        Ok(Self::new(stopwords)
            .with_policy(config.policy)
            .with_fuzzy_threshold(config.fuzzy_threshold))
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f32) -> Self {
        self.fuzzy_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn fuzzy_threshold(&self) -> f32 {
        self.fuzzy_threshold
    }

    /// The phrase extractor sharing this matcher's stopword set.
    pub fn extractor(&self) -> &RakeExtractor {
        &self.extractor
    }

    /// Normalize a query into its significant tokens: lower-cased words
    /// with stopwords removed, as a set.
    ///
    /// Tokens of any length survive; a short token matching inside longer
    /// words is accepted behavior under the substring policy.
    pub fn normalize_query(&self, query: &str) -> HashSet<String> {
        query
            .unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| !self.stopwords.contains(word))
            .collect()
    }

    /// Extract ranked keyword phrases from raw document text.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        self.extractor.ranked_phrases(text)
    }

    /// Whether any query token matches any keyword phrase under the
    /// configured policy. An empty token set or phrase list never matches.
    pub fn matches(&self, query_tokens: &HashSet<String>, phrases: &[String]) -> bool {
        if query_tokens.is_empty() || phrases.is_empty() {
            return false;
        }

        let prepared = self.prepare(query_tokens);
        phrases.iter().any(|phrase| self.phrase_matches(&prepared, phrase))
    }

    /// Run the full pipeline over a corpus: normalize the query, extract
    /// keywords per document, and decide each match.
    ///
    /// Every document appears in the result. Documents with empty text
    /// yield empty keyword lists and are reported unmatched; nothing here
    /// fails, degenerate inputs degrade to empty results.
    pub fn filter_corpus(&self, query: &str, documents: &BTreeMap<String, String>) -> MatchMap {
        let tokens = self.normalize_query(query);
        let prepared = self.prepare(&tokens);

        let mut results = MatchMap::new();
        for (id, text) in documents {
            let keywords = self.extractor.ranked_phrases(text);
            let matched = !prepared.tokens.is_empty()
                && keywords
                    .iter()
                    .any(|phrase| self.phrase_matches(&prepared, phrase));
            results.insert(id.clone(), DocumentMatch { keywords, matched });
        }

        results
    }

    fn prepare(&self, query_tokens: &HashSet<String>) -> PreparedQuery {
        let tokens: HashSet<String> = query_tokens
            .iter()
            .map(|token| token.to_lowercase())
            .collect();

        let automaton = if self.policy == MatchPolicy::Substring && !tokens.is_empty() {
            match AhoCorasick::new(&tokens) {
                Ok(automaton) => Some(automaton),
                Err(e) => {
                    // Degrades to no matches rather than failing the scan.
                    warn!("Failed to build query automaton: {}", e);
                    None
                }
            }
        } else {
            None
        };

        PreparedQuery { tokens, automaton }
    }

    fn phrase_matches(&self, prepared: &PreparedQuery, phrase: &str) -> bool {
        let phrase_lower = phrase.to_lowercase();

        match self.policy {
            MatchPolicy::Substring => prepared
                .automaton
                .as_ref()
                .map(|automaton| automaton.is_match(phrase_lower.as_str()))
                .unwrap_or(false),
            MatchPolicy::ExactToken => phrase_lower
                .split_whitespace()
                .any(|word| prepared.tokens.contains(word)),
            MatchPolicy::Fuzzy => phrase_lower.split_whitespace().any(|word| {
                prepared
                    .tokens
                    .iter()
                    .any(|token| jaro_winkler(token, word) as f32 >= self.fuzzy_threshold)
            }),
        }
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(StopwordSet::english())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_normalize_query_drops_stopwords() {
        let matcher = KeywordMatcher::default();
        let tokens = matcher.normalize_query("machine learning basics");

        assert_eq!(tokens, ["machine", "learning", "basics"]
            .iter()
            .map(|w| w.to_string())
            .collect());
    }

    #[test]
    fn test_normalize_query_stopwords_only() {
        let matcher = KeywordMatcher::default();

        assert!(matcher.normalize_query("the is of a").is_empty());
        assert!(matcher.normalize_query("").is_empty());
        assert!(matcher.normalize_query("   ").is_empty());
    }

    #[test]
    fn test_normalize_query_collapses_duplicates() {
        let matcher = KeywordMatcher::default();
        let tokens = matcher.normalize_query("rust Rust RUST");

        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("rust"));
    }

    #[test]
    fn test_normalize_query_keeps_short_tokens() {
        let matcher = KeywordMatcher::default();
        let tokens = matcher.normalize_query("ai ml");

        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("ai"));
        assert!(tokens.contains("ml"));
    }

    #[test]
    fn test_substring_match() {
        let matcher = KeywordMatcher::default();

        assert!(matcher.matches(&tokens(&["cat"]), &phrases(&["category theory"])));
        assert!(!matcher.matches(&tokens(&["cat"]), &phrases(&["dog walking"])));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let matcher = KeywordMatcher::default();

        assert!(matcher.matches(&tokens(&["cat"]), &phrases(&["Category Theory"])));
        assert!(matcher.matches(&tokens(&["CAT"]), &phrases(&["category theory"])));
    }

    #[test]
    fn test_empty_inputs_never_match() {
        let matcher = KeywordMatcher::default();

        assert!(!matcher.matches(&HashSet::new(), &phrases(&["category theory"])));
        assert!(!matcher.matches(&tokens(&["cat"]), &[]));
        assert!(!matcher.matches(&HashSet::new(), &[]));
    }

    #[test]
    fn test_exact_token_policy() {
        let matcher = KeywordMatcher::default().with_policy(MatchPolicy::ExactToken);

        assert!(!matcher.matches(&tokens(&["cat"]), &phrases(&["category theory"])));
        assert!(matcher.matches(&tokens(&["theory"]), &phrases(&["category theory"])));
    }

    #[test]
    fn test_fuzzy_policy_tolerates_misspellings() {
        let matcher = KeywordMatcher::default().with_policy(MatchPolicy::Fuzzy);

        assert!(matcher.matches(&tokens(&["pythn"]), &phrases(&["python scripting"])));

        let strict = KeywordMatcher::default();
        assert!(!strict.matches(&tokens(&["pythn"]), &phrases(&["python scripting"])));
    }

    #[test]
    fn test_fuzzy_threshold_is_clamped() {
        let matcher = KeywordMatcher::default().with_fuzzy_threshold(1.7);
        assert_eq!(matcher.fuzzy_threshold(), 1.0);
    }

    #[test]
    fn test_filter_corpus_scenario() {
        let matcher = KeywordMatcher::default();
        let mut documents = BTreeMap::new();
        documents.insert(
            "analysis.txt".to_string(),
            "Machine learning is a method of data analysis that automates analytical model building"
                .to_string(),
        );
        documents.insert("blank.txt".to_string(), String::new());

        let results = matcher.filter_corpus("machine learning basics", &documents);

        assert_eq!(results.len(), 2);

        let analysis = &results["analysis.txt"];
        assert!(analysis.matched);
        assert!(analysis
            .keywords
            .contains(&"machine learning".to_string()));

        let blank = &results["blank.txt"];
        assert!(!blank.matched);
        assert!(blank.keywords.is_empty());
    }

    #[test]
    fn test_filter_corpus_stopword_query_matches_nothing() {
        let matcher = KeywordMatcher::default();
        let mut documents = BTreeMap::new();
        documents.insert("a.txt".to_string(), "quantum computing advances".to_string());
        documents.insert("b.txt".to_string(), "the stopword the".to_string());

        let results = matcher.filter_corpus("the of and is", &documents);

        assert!(results.values().all(|m| !m.matched));
    }

    #[test]
    fn test_filter_corpus_single_relevant_document() {
        let matcher = KeywordMatcher::default();
        let mut documents = BTreeMap::new();
        for i in 0..99 {
            documents.insert(format!("doc{:03}.txt", i), "lorem ipsum dolor".to_string());
        }
        documents.insert(
            "target.txt".to_string(),
            "quantum computing advances rapidly".to_string(),
        );

        let results = matcher.filter_corpus("quantum computing", &documents);

        assert_eq!(results.len(), 100);
        let matched: Vec<_> = results.iter().filter(|(_, m)| m.matched).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].0, "target.txt");
    }

    #[test]
    fn test_from_config_with_extra_stopwords() {
        let config = MatchingConfig {
            policy: MatchPolicy::Substring,
            fuzzy_threshold: 0.8,
            extra_stopwords: vec!["quantum".to_string()],
            stopwords_file: None,
        };
        let matcher = KeywordMatcher::from_config(&config).unwrap();

        let tokens = matcher.normalize_query("quantum computing");
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("computing"));
    }

    #[test]
    fn test_from_config_missing_stopwords_file() {
        let config = MatchingConfig {
            policy: MatchPolicy::Substring,
            fuzzy_threshold: 0.8,
            extra_stopwords: Vec::new(),
            stopwords_file: Some("no/such/file.txt".into()),
        };

        assert!(KeywordMatcher::from_config(&config).is_err());
    }
}
