//! Per-run context: everything a run reads but never mutates.

use tracing::warn;

use crate::{
    config::RunConfig,
    data::taxonomy::Taxonomy,
    nlp::embeddings::Embedder,
    themes::mapper::{self, KeywordMatcher, SubstringContainment},
};

/// Built once before a run starts and dropped when it ends.
pub struct RunContext {
    config: RunConfig,
    taxonomy: Taxonomy,
    embedder: Box<dyn Embedder>,
    matcher: Box<dyn KeywordMatcher>,
}

impl RunContext {
    pub fn new(config: RunConfig, taxonomy: Taxonomy, embedder: Box<dyn Embedder>) -> Self {
        for (category, keyword) in mapper::stopword_keywords(&taxonomy) {
            warn!(category, keyword, "catalog keyword is a stopword and is never extracted as a term");
        }
        Self {
            config,
            taxonomy,
            embedder,
            matcher: Box::new(SubstringContainment),
        }
    }

    /// Swap the keyword scoring rule.
    pub fn with_matcher(mut self, matcher: Box<dyn KeywordMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn matcher(&self) -> &dyn KeywordMatcher {
        self.matcher.as_ref()
    }
}
