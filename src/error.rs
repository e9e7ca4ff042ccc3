//! Typed failures raised by the theme discovery stages.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ThemeError>;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read taxonomy catalog {path}: {source}")]
    TaxonomyIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("taxonomy catalog is not valid JSON: {0}")]
    TaxonomyFormat(#[from] serde_json::Error),

    #[error("invalid taxonomy catalog: {0}")]
    InvalidTaxonomy(String),

    #[error("embedding generation failed: {0}")]
    Embedding(String),

    #[error("embedding shape mismatch: expected {expected}, got {actual}")]
    EmbeddingShape { expected: usize, actual: usize },

    #[error("clustering failed: {0}")]
    Clustering(String),

    #[error("no terms left after tokenisation and stopword removal")]
    EmptyVocabulary,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input row {row}: {reason}")]
    Input { row: usize, reason: String },
}
