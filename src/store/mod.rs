//! Store module - the vector-store contract and its two ranking engines

mod bm25;
mod dense;
mod node;
mod nodes;
mod snapshot;
mod sparse;

pub use bm25::{Bm25Params, Bm25Stats};
pub use dense::DenseStore;
pub use node::{Node, QueryResult};
pub use nodes::NodeMap;
pub use sparse::SparseStore;

use std::cmp::Ordering;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::error;

/// Ranking strategy, chosen at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    /// Cosine similarity over embedding vectors
    Dense,
    /// BM25+ lexical relevance
    Sparse,
}

impl FromStr for RankingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "dense" | "semantic" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            other => anyhow::bail!(
                "Invalid ranking mode `{}`. Choose either `dense` or `sparse`.",
                other
            ),
        }
    }
}

/// Construction-time store configuration
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Enable snapshot (and sidecar) read/write
    pub persist: bool,
    /// Node snapshot location
    pub saved_file: PathBuf,
    /// Derived-statistics sidecar location, sparse engine only
    pub metadata_file: Option<PathBuf>,
    /// Ignore cached snapshot/sidecar and rebuild from supplied nodes
    pub force_index: bool,
}

impl StoreOptions {
    pub fn new(saved_file: impl Into<PathBuf>) -> Self {
        Self {
            persist: false,
            saved_file: saved_file.into(),
            metadata_file: None,
            force_index: false,
        }
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_metadata_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_file = Some(path.into());
        self
    }

    pub fn with_force_index(mut self, force_index: bool) -> Self {
        self.force_index = force_index;
        self
    }
}

/// Shared contract state: the ordered node map plus persistence config
///
/// Mutation goes through `&mut self`, so exclusive access per store instance
/// is enforced at compile time; callers sharing a store across tasks wrap it
/// in their own lock.
pub(crate) struct StoreCore {
    pub(crate) nodes: NodeMap,
    pub(crate) options: StoreOptions,
}

impl StoreCore {
    /// Load the node snapshot eagerly if persistence is on, the file exists,
    /// and a rebuild was not forced
    pub(crate) fn open(options: StoreOptions) -> anyhow::Result<Self> {
        let nodes = if options.persist && !options.force_index && options.saved_file.exists() {
            NodeMap::from_nodes(snapshot::load(&options.saved_file)?)
        } else {
            NodeMap::new()
        };
        Ok(Self { nodes, options })
    }

    /// Lookup miss is reported, never raised
    pub(crate) fn get(&self, id: &str) -> Option<&Node> {
        let node = self.nodes.get(id);
        if node.is_none() {
            error!("Node with id `{}` not found.", id);
        }
        node
    }

    /// Remove a node and re-persist; an absent id is a reported no-op.
    /// Returns whether a node was removed.
    pub(crate) fn remove(&mut self, id: &str) -> anyhow::Result<bool> {
        if self.nodes.remove(id).is_some() {
            self.persist()?;
            Ok(true)
        } else {
            error!("Node with id `{}` not found.", id);
            Ok(false)
        }
    }

    /// Rewrite the node snapshot when persistence is enabled
    pub(crate) fn persist(&self) -> anyhow::Result<()> {
        if self.options.persist {
            snapshot::save(&self.options.saved_file, self.nodes.iter())?;
        }
        Ok(())
    }
}

/// A store of either ranking variant, dispatching the shared operation set
pub enum VectorStore {
    Dense(DenseStore),
    Sparse(SparseStore),
}

impl VectorStore {
    pub fn get(&self, id: &str) -> Option<&Node> {
        match self {
            Self::Dense(store) => store.get(id),
            Self::Sparse(store) => store.get(id),
        }
    }

    pub async fn add(&mut self, nodes: Vec<Node>) -> anyhow::Result<Vec<String>> {
        match self {
            Self::Dense(store) => store.add(nodes).await,
            Self::Sparse(store) => store.add(nodes),
        }
    }

    pub fn delete(&mut self, id: &str) -> anyhow::Result<()> {
        match self {
            Self::Dense(store) => store.delete(id),
            Self::Sparse(store) => store.delete(id),
        }
    }

    pub async fn query(&self, query: &str, top_k: usize) -> anyhow::Result<QueryResult> {
        match self {
            Self::Dense(store) => store.query(query, top_k).await,
            Self::Sparse(store) => store.query(query, top_k),
        }
    }

    pub async fn batch_query(
        &self,
        queries: &[String],
        top_k: usize,
    ) -> anyhow::Result<Vec<QueryResult>> {
        match self {
            Self::Dense(store) => store.batch_query(queries, top_k).await,
            Self::Sparse(store) => store.batch_query(queries, top_k),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Dense(store) => store.len(),
            Self::Sparse(store) => store.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stable descending sort over positional index, truncated to `top_k`
///
/// Ties keep their original corpus order.
pub(crate) fn rank_descending(scores: Vec<f32>, top_k: usize) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);
    scored
}
