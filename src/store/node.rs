//! Node and query-result types - the unit of indexed content and of output

use serde::{Deserialize, Serialize};

/// A single indexed passage with metadata and an optional embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    /// Present once computed; dimensionality is fixed per dense store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Node {
    /// Create a node with no metadata and no embedding
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: serde_json::Value::Null,
            embedding: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Ranked query output: three parallel sequences sorted by score descending
///
/// `nodes`, `scores`, and `ids` always have the same length, at most the
/// `top_k` the query was asked for. An empty store yields all three empty.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub nodes: Vec<Node>,
    pub scores: Vec<f32>,
    pub ids: Vec<String>,
}

impl QueryResult {
    /// Build a result from ranked (node, score) pairs
    pub fn from_ranked(ranked: Vec<(Node, f32)>) -> Self {
        let mut result = Self::default();
        for (node, score) in ranked {
            result.ids.push(node.id.clone());
            result.scores.push(score);
            result.nodes.push(node);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
