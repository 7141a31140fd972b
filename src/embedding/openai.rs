//! OpenAI embedding provider

use std::env;

use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequestArgs, EmbeddingInput},
    Client,
};
use async_trait::async_trait;
use tracing::info;

use super::Embedder;

/// Embeddings via the OpenAI API (or any OpenAI-compatible endpoint)
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model_name: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    pub fn new(
        model_name: String,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let api_key = api_key
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url.or_else(|| env::var("OPENAI_BASE_URL").ok()) {
            config = config.with_api_base(base_url);
        }

        let dimensions = match model_name.as_str() {
            "text-embedding-3-small" => 1536,
            "text-embedding-3-large" => 3072,
            "text-embedding-ada-002" => 1536,
            _ => 0, // Unknown - detected on first embed call
        };

        info!(
            "OpenAI embedder: {} ({})",
            model_name,
            if dimensions == 0 {
                "dims auto".to_string()
            } else {
                format!("{} dims", dimensions)
            }
        );

        Ok(Self {
            client: Client::with_config(config),
            model_name,
            dimensions,
        })
    }

    /// Construct, probing the API once if the model's dimensions are unknown
    pub async fn new_with_detection(
        model_name: String,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut provider = Self::new(model_name, api_key, base_url)?;

        if provider.dimensions == 0 {
            let probe = provider.embed(&["dimension probe"]).await?;
            if let Some(embedding) = probe.first() {
                provider.dimensions = embedding.len();
                info!("Detected embedding dimensions: {}", provider.dimensions);
            }
        }

        Ok(provider)
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // OpenAI caps embedding batches at 100 inputs
        let batch_size = 100;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(batch_size) {
            let inputs: Vec<String> = batch.iter().map(|s| s.to_string()).collect();
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model_name)
                .input(EmbeddingInput::StringArray(inputs))
                .build()?;

            let response = self.client.embeddings().create(request).await?;
            for data in response.data {
                all_embeddings.push(data.embedding);
            }
        }

        Ok(all_embeddings)
    }
}
