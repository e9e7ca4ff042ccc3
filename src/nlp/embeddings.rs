//! Review text embedding backends.

use tracing::{debug, info};

#[cfg(feature = "embeddings")]
use std::sync::Mutex;

#[cfg(feature = "embeddings")]
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::{
    error::{Result, ThemeError},
    nlp::terms,
};

/// Output width of all-MiniLM-L6-v2, shared by the hashing fallback.
pub const EMBEDDING_DIM: usize = 384;

/// Black-box "text to vector" capability.
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    /// One vector per input text, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Signed feature hashing of content unigrams and bigrams.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for feature in terms::ngrams(&terms::content_tokens(text)) {
            let hash = fnv1a(feature.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}

/// Sentence-transformer embeddings via fastembed.
#[cfg(feature = "embeddings")]
pub struct MiniLmEmbedder {
    model: Mutex<TextEmbedding>,
}

#[cfg(feature = "embeddings")]
impl MiniLmEmbedder {
    pub fn try_new() -> Result<Self> {
        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|err| ThemeError::Embedding(err.to_string()))?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

#[cfg(feature = "embeddings")]
impl Embedder for MiniLmEmbedder {
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let documents: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut model = self
            .model
            .lock()
            .map_err(|_| ThemeError::Embedding("encoder lock poisoned".into()))?;
        model
            .embed(documents, None)
            .map_err(|err| ThemeError::Embedding(err.to_string()))
    }
}

/// The encoder this build ships with.
pub fn default_embedder() -> Result<Box<dyn Embedder>> {
    #[cfg(feature = "embeddings")]
    {
        info!("using all-MiniLM-L6-v2 encoder");
        Ok(Box::new(MiniLmEmbedder::try_new()?))
    }
    #[cfg(not(feature = "embeddings"))]
    {
        info!("embeddings feature disabled; using hashing encoder");
        Ok(Box::new(HashingEmbedder::default()))
    }
}

/// Embed every review text and check the result shape.
pub fn embed_reviews(embedder: &dyn Embedder, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }
    let vectors = embedder.embed(texts)?;
    if vectors.len() != texts.len() {
        return Err(ThemeError::EmbeddingShape {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != embedder.dimension()) {
        return Err(ThemeError::EmbeddingShape {
            expected: embedder.dimension(),
            actual: bad.len(),
        });
    }
    debug!(count = vectors.len(), dim = embedder.dimension(), "embedded reviews");
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_vectors_are_unit_length_and_stable() {
        let embedder = HashingEmbedder::default();
        let texts = vec!["delivery delay again".to_string()];
        let first = embedder.embed(&texts).unwrap();
        let norm: f32 = first[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(first, embedder.embed(&texts).unwrap());
    }

    #[test]
    fn stopword_only_text_embeds_to_zero() {
        let embedder = HashingEmbedder::new(8);
        let vectors = embedder.embed(&["the and of".to_string()]).unwrap();
        assert!(vectors[0].iter().all(|v| *v == 0.0));
    }
}
