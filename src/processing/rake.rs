//! Keyword phrase extraction using degree-based scoring (RAKE)

use crate::processing::stopwords::StopwordSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Extracts ranked keyword phrases from unstructured text.
///
/// Candidate phrases are maximal runs of non-stopword words uninterrupted
/// by punctuation. Each phrase is scored by the degree-to-frequency ratio
/// of its constituent words across the whole document, so words that
/// co-occur inside longer phrases outrank isolated frequent words.
pub struct RakeExtractor {
    stopwords: StopwordSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPhrase {
    pub phrase: String,
    pub score: f64,
}

impl RakeExtractor {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    /// Extract phrases with their scores, highest score first.
    ///
    /// The sort is stable: phrases with equal scores keep the order of
    /// their appearance in the text, so output is deterministic for a
    /// given input. Repeated candidate phrases are retained and scored
    /// with multiplicity.
    pub fn extract(&self, text: &str) -> Vec<ScoredPhrase> {
        let phrases = self.candidate_phrases(text);
        if phrases.is_empty() {
            return Vec::new();
        }

        // Word frequency and degree over all candidate phrases. The degree
        // of a word is the summed length of every phrase containing it,
        // counting the word itself.
        let mut frequency: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();

        for phrase in &phrases {
            let phrase_len = phrase.len() as f64;
            for word in phrase {
                *frequency.entry(word.as_str()).or_insert(0.0) += 1.0;
                *degree.entry(word.as_str()).or_insert(0.0) += phrase_len;
            }
        }

        let mut scored: Vec<ScoredPhrase> = phrases
            .iter()
            .map(|phrase| {
                let score = phrase
                    .iter()
                    .map(|word| degree[word.as_str()] / frequency[word.as_str()])
                    .sum();
                ScoredPhrase {
                    phrase: phrase.join(" "),
                    score,
                }
            })
            .collect();

        // Stable sort keeps appearance order for equal scores.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored
    }

    /// Extract ranked phrases without scores.
    pub fn ranked_phrases(&self, text: &str) -> Vec<String> {
        self.extract(text)
            .into_iter()
            .map(|scored| scored.phrase)
            .collect()
    }

    /// Split text into candidate phrases at stopword and punctuation
    /// boundaries. Words are lower-cased; stopwords are dropped; any
    /// non-whitespace character between adjacent words ends the phrase.
    fn candidate_phrases(&self, text: &str) -> Vec<Vec<String>> {
        let mut phrases: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut previous_end: Option<usize> = None;

        for (start, word) in text.unicode_word_indices() {
            let punctuation_gap = previous_end
                .map(|end| text[end..start].chars().any(|c| !c.is_whitespace()))
                .unwrap_or(false);

            if punctuation_gap && !current.is_empty() {
                phrases.push(std::mem::take(&mut current));
            }

            let lowered = word.to_lowercase();
            if self.stopwords.contains(&lowered) {
                if !current.is_empty() {
                    phrases.push(std::mem::take(&mut current));
                }
            } else {
                current.push(lowered);
            }

            previous_end = Some(start + word.len());
        }

        if !current.is_empty() {
            phrases.push(current);
        }

        phrases
    }
}

impl Default for RakeExtractor {
    fn default() -> Self {
        Self::new(StopwordSet::english())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let extractor = RakeExtractor::default();

        assert!(extractor.ranked_phrases("").is_empty());
        assert!(extractor.ranked_phrases("   \n\t  ").is_empty());
    }

    #[test]
    fn test_stopword_only_text() {
        let extractor = RakeExtractor::default();

        assert!(extractor.ranked_phrases("the is of a that").is_empty());
    }

    #[test]
    fn test_phrases_split_at_stopwords() {
        let extractor = RakeExtractor::default();
        let phrases = extractor.ranked_phrases("machine learning is a method");

        assert!(phrases.contains(&"machine learning".to_string()));
        assert!(phrases.contains(&"method".to_string()));
        assert_eq!(phrases.len(), 2);
    }

    #[test]
    fn test_phrases_split_at_punctuation() {
        let extractor = RakeExtractor::default();
        let phrases = extractor.ranked_phrases("rust, memory safety");

        assert!(phrases.contains(&"rust".to_string()));
        assert!(phrases.contains(&"memory safety".to_string()));
        assert!(!phrases.iter().any(|p| p.contains("rust memory")));
    }

    #[test]
    fn test_degree_scoring_ranks_longer_phrases_first() {
        let extractor = RakeExtractor::default();
        let text =
            "Machine learning is a method of data analysis that automates analytical model building";
        let scored = extractor.extract(text);

        assert_eq!(scored[0].phrase, "automates analytical model building");
        assert_eq!(scored[0].score, 16.0);

        let machine_learning = scored
            .iter()
            .find(|s| s.phrase == "machine learning")
            .unwrap();
        assert_eq!(machine_learning.score, 4.0);

        let method = scored.iter().find(|s| s.phrase == "method").unwrap();
        assert_eq!(method.score, 1.0);
    }

    #[test]
    fn test_shared_word_lowers_single_word_score() {
        let extractor = RakeExtractor::default();
        let scored = extractor.extract("green apples. apples");

        assert_eq!(scored[0].phrase, "green apples");
        assert_eq!(scored[0].score, 3.5);
        assert_eq!(scored[1].phrase, "apples");
        assert_eq!(scored[1].score, 1.5);
    }

    #[test]
    fn test_ties_keep_appearance_order() {
        let extractor = RakeExtractor::default();
        let phrases = extractor.ranked_phrases("red cars. blue sky");

        assert_eq!(phrases, vec!["red cars".to_string(), "blue sky".to_string()]);
    }

    #[test]
    fn test_repeated_phrases_are_retained() {
        let extractor = RakeExtractor::default();
        let phrases = extractor.ranked_phrases("deep learning and deep learning");

        assert_eq!(phrases.len(), 2);
        assert!(phrases.iter().all(|p| p == "deep learning"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = RakeExtractor::default();
        let text = "Compatibility of systems of linear constraints over the set of natural numbers. \
                    Criteria of compatibility of a system of linear Diophantine equations are considered.";

        let first = extractor.ranked_phrases(text);
        let second = extractor.ranked_phrases(text);

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_phrases_are_lowercased() {
        let extractor = RakeExtractor::default();
        let phrases = extractor.ranked_phrases("Machine Learning");

        assert_eq!(phrases, vec!["machine learning".to_string()]);
    }

    #[test]
    fn test_custom_stopwords() {
        let extractor = RakeExtractor::new(StopwordSet::from_words(["machine"]));
        let phrases = extractor.ranked_phrases("machine learning");

        assert_eq!(phrases, vec!["learning".to_string()]);
    }
}
