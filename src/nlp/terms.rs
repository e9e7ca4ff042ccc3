//! TF-IDF term and bigram extraction over a cluster's member texts.

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use stop_words::{get, LANGUAGE};

use crate::error::{Result, ThemeError};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

// NLTK's short English list. The stopwords-iso list also drops content words
// such as "help" and "different" that catalogs rely on.
static STOP_WORDS: Lazy<HashSet<String>> =
    Lazy::new(|| get(LANGUAGE::English).into_iter().collect());

/// Lowercase word runs of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whether `token` is removed before term extraction.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Tokens with English stopwords removed.
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .collect()
}

/// Unigrams followed by bigrams of adjacent content tokens.
pub fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut features: Vec<String> = tokens.to_vec();
    features.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    features
}

/// Picks the most discriminative terms of a document set.
#[derive(Debug, Clone, Copy)]
pub struct TermExtractor {
    pub max_terms: usize,
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self { max_terms: 10 }
    }
}

impl TermExtractor {
    pub fn new(max_terms: usize) -> Self {
        Self { max_terms }
    }

    /// Rank unigrams and bigrams by summed, row-normalised TF-IDF weight.
    ///
    /// This is not a corpus-frequency cut: a scikit-learn style
    /// `max_features` vocabulary keeps the most frequent terms, while this
    /// ranking favours terms that are heavy within few documents. Ties break
    /// lexicographically.
    ///
    /// Fails with [`ThemeError::EmptyVocabulary`] when nothing survives
    /// stopword removal.
    pub fn extract<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<String>> {
        let counts: Vec<BTreeMap<String, f64>> = documents
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for feature in ngrams(&content_tokens(doc.as_ref())) {
                    *tf.entry(feature).or_insert(0.0) += 1.0;
                }
                tf
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if doc_freq.is_empty() {
            return Err(ThemeError::EmptyVocabulary);
        }

        let n_docs = counts.len() as f64;
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for tf in &counts {
            let weights: Vec<(&str, f64)> = tf
                .iter()
                .map(|(term, count)| {
                    let df = doc_freq.get(term.as_str()).copied().unwrap_or(1) as f64;
                    let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
                    (term.as_str(), count * idf)
                })
                .collect();
            let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (term, weight) in weights {
                *totals.entry(term).or_insert(0.0) += weight / norm;
            }
        }

        let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Ok(ranked
            .into_iter()
            .take(self.max_terms)
            .map(|(term, _)| term.to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_drops_single_characters_and_lowercases() {
        assert_eq!(tokenize("A Courier, 2 DAYS late!"), vec!["courier", "days", "late"]);
    }

    #[test]
    fn bigrams_follow_unigrams() {
        let tokens = vec!["delivery".to_string(), "delay".to_string()];
        assert_eq!(ngrams(&tokens), vec!["delivery", "delay", "delivery delay"]);
    }

    #[test]
    fn catalog_words_survive_stopword_removal() {
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("help"));
        assert!(!is_stop_word("different"));
        assert_eq!(content_tokens("Nobody will help me"), vec!["nobody", "help"]);
    }

    #[test]
    fn stopword_only_documents_have_no_vocabulary() {
        let extractor = TermExtractor::default();
        let err = extractor.extract(&["the and of", "it is a"]).unwrap_err();
        assert!(matches!(err, ThemeError::EmptyVocabulary));
        assert!(matches!(
            extractor.extract::<&str>(&[]),
            Err(ThemeError::EmptyVocabulary)
        ));
    }

    #[test]
    fn extraction_is_capped_and_deterministic() {
        let docs = [
            "courier delivery delay again",
            "delivery delay courier rude",
            "refund pending delivery delay",
        ];
        let extractor = TermExtractor::new(4);
        let first = extractor.extract(&docs).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first, extractor.extract(&docs).unwrap());
        assert!(first.iter().any(|t| t == "delivery delay" || t == "delivery"));
    }
}
