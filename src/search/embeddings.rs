//! Embedding providers
//!
//! The [`Embedder`] trait is the only thing the search engine knows about
//! text-to-vector inference. The built-in [`HashEmbedder`] implements
//! FNV-1a feature hashing: no model download, fully deterministic.

use crate::config::EmbeddingConfig;
use crate::error::{DsError, Result};
use crate::search::api::ApiEmbedder;
use crate::search::similarity::l2_normalize;

/// Pluggable embedding backend interface
pub trait Embedder: Send + Sync {
    /// Encode `text` into a vector of exactly [`Embedder::dims`] floats.
    ///
    /// Fails with [`DsError::Encoding`] on empty or un-encodable input.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimensionality, fixed for the lifetime of the instance.
    fn dims(&self) -> usize;

    /// Backend name, for diagnostics.
    fn name(&self) -> &str;
}

/// Build an embedder from config.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    let backend = config.backend.trim().to_lowercase();
    let dims = config.dims as usize;
    if dims == 0 {
        return Err(DsError::Config(
            "embedding.dims must be greater than 0".to_string(),
        ));
    }

    match backend.as_str() {
        "" | "hash" => Ok(Box::new(HashEmbedder::new(dims))),
        "api" => Ok(Box::new(ApiEmbedder::from_config(config)?)),
        other => Err(DsError::Config(format!(
            "unknown embedding backend: {other} (expected hash or api)"
        ))),
    }
}

/// Reject empty or whitespace-only input before encoding.
pub(crate) fn ensure_encodable(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(DsError::Encoding("cannot embed empty text".to_string()));
    }
    Ok(())
}

/// Hash embedder using FNV-1a
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    /// Embedding dimension (default: 384)
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashEmbedder {
    /// Create embedder with specified dimension
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embed text into an L2-normalized vector.
    ///
    /// Text without any usable token yields the zero vector.
    fn embed_tokens(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut embedding = vec![0.0; self.dim];

        if tokens.is_empty() {
            return embedding;
        }

        for token in &tokens {
            accumulate_embedding(&mut embedding, token, 1.0);
        }

        for window in tokens.windows(2) {
            let bigram = format!("{} {}", window[0], window[1]);
            accumulate_embedding(&mut embedding, &bigram, 0.5);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        ensure_encodable(text)?;
        Ok(self.embed_tokens(text))
    }

    fn dims(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hash"
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_string())
        .collect()
}

fn accumulate_embedding(embedding: &mut [f32], token: &str, weight: f32) {
    let token_hash = fnv1a_hash(token.as_bytes());

    for i in 0..embedding.len() {
        let dim_hash = fnv1a_hash_with_salt(token_hash, i as u64);
        let sign = if dim_hash & 1 == 0 { weight } else { -weight };
        let dim = ((dim_hash >> 1) as usize) % embedding.len();
        embedding[dim] += sign;
    }
}

fn fnv1a_hash_with_salt(seed: u64, salt: u64) -> u64 {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..].copy_from_slice(&salt.to_le_bytes());
    fnv1a_hash(&bytes)
}

fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
