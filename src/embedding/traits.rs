//! Embedder trait - the injected embedding collaborator

use async_trait::async_trait;

/// Text -> fixed-length float vector, assumed deterministic
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality; 0 means not yet known
    fn dimensions(&self) -> usize;

    /// Compute embeddings for a batch of texts, one vector per text
    async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;
}
