//! BM25+ corpus statistics and scoring
//!
//! The statistics are an artifact of one corpus snapshot: built in a single
//! pass over the tokenized documents, serialized verbatim to a JSON sidecar,
//! and rebuilt from scratch whenever the corpus changes.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// BM25+ hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bm25Params {
    /// Term-frequency saturation
    pub k1: f32,
    /// Document-length normalization
    pub b: f32,
    /// Long-document correction relative to classic BM25
    pub delta: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            delta: 0.25,
        }
    }
}

/// Derived corpus statistics for BM25+ scoring
///
/// Document order matches the corpus order the statistics were built from;
/// scores come back as one value per document in that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bm25Stats {
    /// Number of documents in the corpus
    pub corpus_size: usize,
    /// Average document length in tokens
    pub avgdl: f32,
    /// Per-document term-frequency maps, one per document
    pub doc_freqs: Vec<HashMap<String, usize>>,
    /// Per-term inverse document frequency; terms never seen are absent
    pub idf: HashMap<String, f32>,
    /// Per-document token counts
    pub doc_len: Vec<usize>,
    /// Document count, restated
    pub nd: usize,
}

impl Bm25Stats {
    /// Build statistics from a tokenized corpus, one token list per document
    pub fn build(corpus: &[Vec<String>]) -> Self {
        let corpus_size = corpus.len();
        let mut doc_freqs = Vec::with_capacity(corpus_size);
        let mut doc_len = Vec::with_capacity(corpus_size);
        // term -> number of documents containing it
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut total_tokens = 0usize;

        for document in corpus {
            doc_len.push(document.len());
            total_tokens += document.len();

            let mut frequencies: HashMap<String, usize> = HashMap::new();
            for token in document {
                *frequencies.entry(token.clone()).or_insert(0) += 1;
            }
            for term in frequencies.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
            doc_freqs.push(frequencies);
        }

        let avgdl = if corpus_size > 0 {
            total_tokens as f32 / corpus_size as f32
        } else {
            0.0
        };

        let idf = df
            .into_iter()
            .map(|(term, count)| (term, idf(count, corpus_size)))
            .collect();

        Self {
            corpus_size,
            avgdl,
            doc_freqs,
            idf,
            doc_len,
            nd: corpus_size,
        }
    }

    /// Score a tokenized query against every document
    ///
    /// Accumulated additively per query token; a token repeated in the query
    /// contributes once per occurrence. Tokens absent from the corpus have no
    /// idf entry and contribute nothing.
    pub fn scores(&self, query_tokens: &[String], params: &Bm25Params) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.corpus_size];
        if self.corpus_size == 0 || self.avgdl == 0.0 {
            return scores;
        }

        let Bm25Params { k1, b, delta } = *params;

        for token in query_tokens {
            let idf = match self.idf.get(token) {
                Some(&idf) => idf,
                None => continue,
            };

            for (doc_id, frequencies) in self.doc_freqs.iter().enumerate() {
                let freq = frequencies.get(token).copied().unwrap_or(0) as f32;
                let norm = 1.0 - b + b * self.doc_len[doc_id] as f32 / self.avgdl;
                let ctd = freq / norm;
                // The +delta floor means every document picks up a little
                // mass for an in-corpus query term, even at freq 0.
                scores[doc_id] += idf * (k1 + 1.0) * (ctd + delta) / (k1 + ctd + delta);
            }
        }

        scores
    }

    /// Load statistics from a JSON sidecar file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let stats: Bm25Stats = serde_json::from_str(&content)?;
        Ok(stats)
    }

    /// Save statistics to a JSON sidecar file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Inverse document frequency: ln((N - df + 0.5) / (df + 0.5) + 1)
fn idf(doc_count: usize, corpus_size: usize) -> f32 {
    ((corpus_size as f32 - doc_count as f32 + 0.5) / (doc_count as f32 + 0.5) + 1.0).ln()
}
