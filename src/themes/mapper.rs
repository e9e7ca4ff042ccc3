//! Deterministic taxonomy labeling of clusters.
//!
//! A cluster's top TF-IDF terms are scored against every catalog category;
//! the strictly highest score wins, ties go to the category listed first,
//! and a best score of zero means the catch-all theme.

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    data::taxonomy::Taxonomy,
    error::ThemeError,
    nlp::terms::{self, TermExtractor},
};

/// Label for clusters that match no category.
pub const CATCH_ALL_THEME: &str = "Other / Emerging Issues";

/// Description used when the label has no catalog entry.
pub const CATCH_ALL_DESCRIPTION: &str = "Emerging issues or uncategorized feedback.";

/// Decides whether an extracted term counts as a hit for a catalog keyword.
pub trait KeywordMatcher: Send + Sync {
    fn matches(&self, term: &str, keyword: &str) -> bool;
}

/// Either string contains the other. Known to over-match short keywords.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringContainment;

impl KeywordMatcher for SubstringContainment {
    fn matches(&self, term: &str, keyword: &str) -> bool {
        term.contains(keyword) || keyword.contains(term)
    }
}

/// Winning category for one term set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub label: String,
    pub score: usize,
}

impl CategoryMatch {
    pub fn is_catch_all(&self) -> bool {
        self.score == 0
    }
}

/// Taxonomy outcome for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterLabel {
    pub cluster_id: usize,
    pub size: usize,
    pub terms: Vec<String>,
    pub label: String,
    pub score: usize,
}

/// Number of (term, keyword) pairs the matcher accepts.
pub fn score_terms(terms: &[String], keywords: &[String], matcher: &dyn KeywordMatcher) -> usize {
    terms
        .iter()
        .map(|term| {
            keywords
                .iter()
                .filter(|keyword| matcher.matches(term, keyword))
                .count()
        })
        .sum()
}

/// Pick the category for `terms`.
pub fn assign_category(
    terms: &[String],
    taxonomy: &Taxonomy,
    matcher: &dyn KeywordMatcher,
) -> CategoryMatch {
    let mut best = CategoryMatch {
        label: CATCH_ALL_THEME.to_string(),
        score: 0,
    };
    for (name, entry) in taxonomy.iter() {
        let score = score_terms(terms, &entry.keywords, matcher);
        if score > best.score {
            best = CategoryMatch {
                label: name.to_string(),
                score,
            };
        }
    }
    if best.score == 0 {
        best.label = CATCH_ALL_THEME.to_string();
    }
    best
}

/// Catalog keywords made only of stopwords, as `(category, keyword)` pairs.
///
/// The extractor never emits such words, so these keywords can only ever
/// score through containment in a longer term.
pub fn stopword_keywords(taxonomy: &Taxonomy) -> Vec<(&str, &str)> {
    taxonomy
        .iter()
        .flat_map(|(name, entry)| {
            entry
                .keywords
                .iter()
                .filter(|keyword| terms::content_tokens(keyword).is_empty())
                .map(move |keyword| (name, keyword.as_str()))
        })
        .collect()
}

/// Label one cluster from its member texts.
///
/// Term extraction failures leave the term set empty, which lands the
/// cluster in the catch-all theme.
pub fn label_cluster<S: AsRef<str>>(
    cluster_id: usize,
    texts: &[S],
    extractor: &TermExtractor,
    taxonomy: &Taxonomy,
    matcher: &dyn KeywordMatcher,
) -> ClusterLabel {
    let terms = match extractor.extract(texts) {
        Ok(terms) => terms,
        Err(ThemeError::EmptyVocabulary) => {
            warn!(cluster_id, "no terms extracted; cluster falls back to catch-all");
            Vec::new()
        }
        Err(err) => {
            warn!(cluster_id, %err, "term extraction failed; cluster falls back to catch-all");
            Vec::new()
        }
    };
    let category = assign_category(&terms, taxonomy, matcher);
    debug!(
        cluster_id,
        size = texts.len(),
        label = %category.label,
        score = category.score,
        terms = ?terms,
        "labeled cluster"
    );
    ClusterLabel {
        cluster_id,
        size: texts.len(),
        terms,
        label: category.label,
        score: category.score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_works_in_both_directions() {
        let matcher = SubstringContainment;
        assert!(matcher.matches("delivery delay", "delay"));
        assert!(matcher.matches("app", "app crash"));
        assert!(!matcher.matches("refund", "delay"));
    }

    #[test]
    fn score_counts_every_matching_pair() {
        let terms = vec!["late delivery".to_string(), "courier".to_string()];
        let keywords = vec!["late".to_string(), "delivery".to_string(), "courier".to_string()];
        assert_eq!(score_terms(&terms, &keywords, &SubstringContainment), 3);
    }

    #[test]
    fn stopword_keywords_are_reported_per_category() {
        let taxonomy = Taxonomy::from_json(
            r#"{"Support": {"keywords": ["help", "why not", "customer care"], "description": "d"}}"#,
        )
        .unwrap();
        assert_eq!(stopword_keywords(&taxonomy), vec![("Support", "why not")]);
    }
}
