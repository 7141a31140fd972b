//! Ollama embedding provider

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Embedder;

const DEFAULT_HOST: &str = "http://localhost:11434";

/// Embeddings via a local Ollama server
pub struct OllamaEmbedder {
    client: Client,
    host: String,
    model_name: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    pub fn new(model_name: String, host: Option<String>) -> Self {
        let host = host
            .or_else(|| env::var("RAGSTORE_OLLAMA_HOST").ok())
            .or_else(|| env::var("OLLAMA_HOST").ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let dimensions = match model_name.split(':').next().unwrap_or(&model_name) {
            "nomic-embed-text" => 768,
            "mxbai-embed-large" => 1024,
            "all-minilm" => 384,
            "bge-m3" => 1024,
            _ => 768,
        };

        info!(
            "Ollama embedder: {} @ {} ({} dims)",
            model_name, host, dimensions
        );

        Self {
            client: Client::new(),
            host,
            model_name,
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Ollama handles modest batches best
        let batch_size = 32;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(batch_size) {
            let request = EmbedRequest {
                model: self.model_name.clone(),
                input: batch.iter().map(|s| s.to_string()).collect(),
            };

            let response = self
                .client
                .post(format!("{}/api/embed", self.host))
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Ollama API error {}: {}", status, body);
            }

            let embed_response: EmbedResponse = response.json().await?;
            all_embeddings.extend(embed_response.embeddings);
        }

        Ok(all_embeddings)
    }
}
