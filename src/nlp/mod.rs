//! Text processing: embeddings, clustering and term extraction.

pub mod cluster;
pub mod embeddings;
pub mod terms;
