//! Sparse ranking engine - BM25+ lexical relevance
//!
//! Indexing is a full rebuild of the corpus statistics on every mutation;
//! there is no incremental maintenance. Tokenization of the corpus is the
//! only parallel step and each document is independent, so the rebuild fans
//! out over rayon and merges back in corpus order.

use rayon::prelude::*;
use tracing::warn;

use crate::tokenizer::Tokenizer;

use super::bm25::{Bm25Params, Bm25Stats};
use super::node::{Node, QueryResult};
use super::rank_descending;
use super::{StoreCore, StoreOptions};

/// BM25+ store over an injected tokenizer
pub struct SparseStore {
    core: StoreCore,
    tokenizer: Box<dyn Tokenizer>,
    params: Bm25Params,
    stats: Bm25Stats,
}

impl SparseStore {
    /// Open a sparse store, loading the node snapshot and either the cached
    /// statistics sidecar or a fresh rebuild
    pub fn open(options: StoreOptions, tokenizer: Box<dyn Tokenizer>) -> anyhow::Result<Self> {
        let core = StoreCore::open(options)?;
        let mut store = Self {
            core,
            tokenizer,
            params: Bm25Params::default(),
            stats: Bm25Stats::default(),
        };

        if !store.core.nodes.is_empty() {
            let cached = store
                .core
                .options
                .metadata_file
                .as_ref()
                .filter(|path| path.exists() && !store.core.options.force_index)
                .cloned();

            match cached {
                // The sidecar is trusted verbatim; no cross-check against
                // the node map.
                Some(path) => store.stats = Bm25Stats::load(&path)?,
                None => store.rebuild()?,
            }
        }

        Ok(store)
    }

    /// Override the default BM25+ hyperparameters
    pub fn with_params(mut self, params: Bm25Params) -> Self {
        self.params = params;
        self
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.core.get(id)
    }

    /// Add nodes, persist the snapshot, then rebuild the statistics over the
    /// whole corpus
    pub fn add(&mut self, nodes: Vec<Node>) -> anyhow::Result<Vec<String>> {
        let ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();
        for node in nodes {
            self.core.nodes.insert(node);
        }
        self.core.persist()?;
        self.rebuild()?;
        Ok(ids)
    }

    /// Delete a node if present and re-persist
    ///
    /// Statistics positions must stay aligned with the node map, so a
    /// successful delete rebuilds them too.
    pub fn delete(&mut self, id: &str) -> anyhow::Result<()> {
        if self.core.remove(id)? {
            self.rebuild()?;
        }
        Ok(())
    }

    pub fn query(&self, query: &str, top_k: usize) -> anyhow::Result<QueryResult> {
        if self.core.nodes.is_empty() {
            warn!("No documents found in the index.");
            return Ok(QueryResult::default());
        }

        let query_tokens = self.tokenizer.tokenize(query);
        let scores = self.stats.scores(&query_tokens, &self.params);

        let mut ranked = Vec::new();
        for (pos, score) in rank_descending(scores, top_k) {
            match self.core.nodes.at(pos) {
                Some(node) => ranked.push((node.clone(), score)),
                // Possible only with a sidecar built over a larger corpus
                // than the current node map.
                None => warn!("Ranked position {} has no node, skipping.", pos),
            }
        }

        Ok(QueryResult::from_ranked(ranked))
    }

    /// Independent per-query ranking, order-preserving
    pub fn batch_query(&self, queries: &[String], top_k: usize) -> anyhow::Result<Vec<QueryResult>> {
        queries.iter().map(|q| self.query(q, top_k)).collect()
    }

    pub fn len(&self) -> usize {
        self.core.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.nodes.is_empty()
    }

    /// Recompute the corpus statistics from scratch and rewrite the sidecar
    fn rebuild(&mut self) -> anyhow::Result<()> {
        let corpus = self.tokenize_corpus();
        self.stats = Bm25Stats::build(&corpus);

        if self.core.options.persist {
            if let Some(path) = &self.core.options.metadata_file {
                self.stats.save(path)?;
            }
        }

        Ok(())
    }

    /// Tokenize every document, in parallel, preserving corpus order
    fn tokenize_corpus(&self) -> Vec<Vec<String>> {
        let texts: Vec<&str> = self.core.nodes.iter().map(|n| n.text.as_str()).collect();
        texts
            .par_iter()
            .map(|text| self.tokenizer.tokenize(text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;

    fn memory_options(dir: &std::path::Path) -> StoreOptions {
        StoreOptions::new(dir.join("nodes.jsonl"))
            .with_metadata_file(dir.join("stats.json"))
    }

    fn persistent_options(dir: &std::path::Path) -> StoreOptions {
        memory_options(dir).with_persist(true)
    }

    fn open_with(options: StoreOptions) -> SparseStore {
        SparseStore::open(options, Box::new(WordTokenizer)).unwrap()
    }

    fn corpus() -> Vec<Node> {
        vec![
            Node::new("0", "the cat sat"),
            Node::new("1", "the dog ran"),
        ]
    }

    #[test]
    fn test_add_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_with(memory_options(dir.path()));

        let ids = store.add(corpus()).unwrap();
        assert_eq!(ids, vec!["0", "1"]);
        assert_eq!(store.get("0").unwrap().text, "the cat sat");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_delete_then_get_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_with(memory_options(dir.path()));
        store.add(corpus()).unwrap();

        store.delete("0").unwrap();
        assert!(store.get("0").is_none());
        // Absent id is a no-op
        store.delete("0").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_query_ranks_matching_document_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_with(memory_options(dir.path()));
        store.add(corpus()).unwrap();

        let result = store.query("cat", 2).unwrap();
        assert_eq!(result.ids[0], "0");
        assert!(result.scores[0] > result.scores[1]);
    }

    #[test]
    fn test_query_empty_store_returns_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_with(memory_options(dir.path()));

        let result = store.query("anything", 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_bounded_and_non_increasing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_with(memory_options(dir.path()));
        store.add(vec![
            Node::new("0", "rust systems programming"),
            Node::new("1", "rust retrieval index"),
            Node::new("2", "python scripting"),
        ]).unwrap();

        let result = store.query("rust index", 2).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.scores[0] >= result.scores[1]);

        let all = store.query("rust index", 10).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_batch_query_matches_individual_queries() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_with(memory_options(dir.path()));
        store.add(corpus()).unwrap();

        let queries = vec!["cat".to_string(), "dog".to_string()];
        let batch = store.batch_query(&queries, 2).unwrap();
        for (query, batched) in queries.iter().zip(&batch) {
            let single = store.query(query, 2).unwrap();
            assert_eq!(batched.ids, single.ids);
            assert_eq!(batched.scores, single.scores);
        }
    }

    #[test]
    fn test_reload_from_sidecar_matches_rebuild() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = open_with(persistent_options(dir.path()));
        store.add(corpus()).unwrap();
        let fresh = store.query("cat", 2).unwrap();
        let (avgdl, idf_cat) = (store.stats.avgdl, store.stats.idf["cat"]);
        drop(store);

        // Sidecar present, force_index off: statistics are loaded, not rebuilt
        let reloaded = open_with(persistent_options(dir.path()));
        assert_eq!(reloaded.stats.avgdl, avgdl);
        assert_eq!(reloaded.stats.idf["cat"], idf_cat);
        assert_eq!(reloaded.stats.doc_len, vec![3, 3]);

        let replayed = reloaded.query("cat", 2).unwrap();
        assert_eq!(replayed.ids, fresh.ids);
        assert_eq!(replayed.scores, fresh.scores);
    }

    #[test]
    fn test_force_index_rebuilds_from_supplied_nodes() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = open_with(persistent_options(dir.path()));
        store.add(corpus()).unwrap();
        drop(store);

        let forced = open_with(persistent_options(dir.path()).with_force_index(true));
        // force_index skips both the snapshot and the sidecar
        assert!(forced.is_empty());
    }
}
