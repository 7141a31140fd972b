//! Embedding module - the embedding collaborator consumed by the dense engine

mod ollama;
mod openai;
mod traits;

pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;
pub use traits::Embedder;

use std::sync::Arc;

/// Embedding provider configuration
#[derive(Debug, Clone)]
pub enum EmbeddingMode {
    Ollama {
        host: Option<String>,
    },
    OpenAI {
        api_key: Option<String>,
        base_url: Option<String>,
    },
}

/// Construct the embedder for a provider configuration
pub async fn create_embedder(
    model_name: &str,
    mode: EmbeddingMode,
) -> anyhow::Result<Arc<dyn Embedder>> {
    match mode {
        EmbeddingMode::Ollama { host } => {
            Ok(Arc::new(OllamaEmbedder::new(model_name.to_string(), host)))
        }
        EmbeddingMode::OpenAI { api_key, base_url } => {
            let provider =
                OpenAIEmbedder::new_with_detection(model_name.to_string(), api_key, base_url)
                    .await?;
            Ok(Arc::new(provider))
        }
    }
}
