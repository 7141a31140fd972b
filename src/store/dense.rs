//! Dense ranking engine - cosine similarity over embedding vectors
//!
//! Every stored node is scored against the query embedding with an exact
//! scan; there is no index acceleration.

use std::sync::Arc;

use tracing::{info, warn};

use crate::embedding::Embedder;

use super::node::{Node, QueryResult};
use super::rank_descending;
use super::{StoreCore, StoreOptions};

/// Embedding-based store over an injected embedder
pub struct DenseStore {
    core: StoreCore,
    embedder: Arc<dyn Embedder>,
}

impl DenseStore {
    /// Open a dense store, loading the node snapshot if one exists
    pub fn open(options: StoreOptions, embedder: Arc<dyn Embedder>) -> anyhow::Result<Self> {
        let core = StoreCore::open(options)?;
        Ok(Self { core, embedder })
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.core.get(id)
    }

    /// Add nodes, computing embeddings for any that lack one, then persist
    pub async fn add(&mut self, mut nodes: Vec<Node>) -> anyhow::Result<Vec<String>> {
        let missing: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.embedding.is_none())
            .map(|(i, _)| i)
            .collect();

        if !missing.is_empty() {
            info!(
                "Found {} node(s) without embedding, computing embeddings",
                missing.len()
            );
            let texts: Vec<&str> = missing.iter().map(|&i| nodes[i].text.as_str()).collect();
            let embeddings = self.embedder.embed(&texts).await?;
            if embeddings.len() != texts.len() {
                anyhow::bail!(
                    "Embedder returned {} vectors for {} texts",
                    embeddings.len(),
                    texts.len()
                );
            }
            for (&i, embedding) in missing.iter().zip(embeddings) {
                nodes[i].embedding = Some(embedding);
            }
        }

        let dimensions = self.embedder.dimensions();
        if dimensions > 0 {
            for node in &nodes {
                if let Some(embedding) = &node.embedding {
                    if embedding.len() != dimensions {
                        anyhow::bail!(
                            "Embedding dimension mismatch for node {}: expected {}, got {}",
                            node.id,
                            dimensions,
                            embedding.len()
                        );
                    }
                }
            }
        }

        let ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();
        for node in nodes {
            self.core.nodes.insert(node);
        }
        self.core.persist()?;
        Ok(ids)
    }

    /// Delete a node if present and re-persist
    pub fn delete(&mut self, id: &str) -> anyhow::Result<()> {
        self.core.remove(id)?;
        Ok(())
    }

    /// Rank all stored nodes by cosine similarity to the query text
    pub async fn query(&self, query: &str, top_k: usize) -> anyhow::Result<QueryResult> {
        if self.core.nodes.is_empty() {
            warn!("No documents found in the index.");
            return Ok(QueryResult::default());
        }

        let query_embeddings = self.embedder.embed(&[query]).await?;
        let query_embedding = query_embeddings
            .first()
            .ok_or_else(|| anyhow::anyhow!("Embedder returned no vector for the query"))?;

        let scores: Vec<f32> = self
            .core
            .nodes
            .iter()
            .map(|node| {
                node.embedding
                    .as_deref()
                    .map(|embedding| cosine_similarity(query_embedding, embedding))
                    .unwrap_or(0.0)
            })
            .collect();

        let ranked = rank_descending(scores, top_k)
            .into_iter()
            .filter_map(|(pos, score)| self.core.nodes.at(pos).map(|n| (n.clone(), score)))
            .collect();

        Ok(QueryResult::from_ranked(ranked))
    }

    /// Independent per-query ranking, order-preserving
    pub async fn batch_query(
        &self,
        queries: &[String],
        top_k: usize,
    ) -> anyhow::Result<Vec<QueryResult>> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.query(query, top_k).await?);
        }
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.core.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.nodes.is_empty()
    }
}

/// Cosine similarity with a zero-norm guard
///
/// A zero-norm query or document makes the cosine undefined; such pairs
/// score 0.0 instead of propagating a division error.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
