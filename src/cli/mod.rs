//! CLI module - command definitions and handlers

mod config_cmd;
mod get;
mod index;
mod remove;
mod search;

pub use config_cmd::ConfigArgs;
pub use get::GetArgs;
pub use index::IndexArgs;
pub use remove::RemoveArgs;
pub use search::SearchArgs;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::embedding::{create_embedder, EmbeddingMode};
use crate::store::{DenseStore, RankingMode, SparseStore, StoreOptions, VectorStore};
use crate::tokenizer::WordTokenizer;

/// ragstore - lightweight text-retrieval store for RAG
#[derive(Parser)]
#[command(name = "ragstore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add passages from a JSONL file to a store
    Index(IndexArgs),

    /// Query a store for the best-matching passages
    Search(SearchArgs),

    /// Fetch a single node by id
    Get(GetArgs),

    /// Delete a node by id
    Remove(RemoveArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Index(args) => index::run(args).await,
            Commands::Search(args) => search::run(args).await,
            Commands::Get(args) => get::run(args).await,
            Commands::Remove(args) => remove::run(args).await,
            Commands::Config(args) => config_cmd::run(args).await,
        }
    }
}

/// Store selection flags shared by the data commands
#[derive(Args, Clone)]
pub struct StoreArgs {
    /// Ranking mode (dense or sparse)
    #[arg(long, short = 'm', default_value = "sparse")]
    pub mode: String,

    /// Node snapshot file (default: <data_dir>/<mode>.jsonl)
    #[arg(long)]
    pub saved_file: Option<PathBuf>,

    /// Statistics sidecar file, sparse mode only
    /// (default: <data_dir>/sparse_metadata.json)
    #[arg(long)]
    pub metadata_file: Option<PathBuf>,

    /// Do not read or write store files
    #[arg(long)]
    pub no_persist: bool,

    /// Ignore cached snapshot/sidecar and rebuild from scratch
    #[arg(long)]
    pub force_index: bool,

    /// Embedding provider (ollama, openai), dense mode only
    #[arg(long, env = "RAGSTORE_EMBEDDING_PROVIDER")]
    pub embedding_provider: Option<String>,

    /// Embedding model name, dense mode only
    #[arg(long, env = "RAGSTORE_EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    /// API key for the embedding service
    #[arg(long, env = "OPENAI_API_KEY")]
    pub embedding_api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub embedding_api_base: Option<String>,

    /// Ollama host for embeddings
    #[arg(long, env = "OLLAMA_HOST")]
    pub embedding_host: Option<String>,
}

impl StoreArgs {
    /// Open the store this invocation selects, failing fast on an unknown
    /// ranking mode or embedding provider
    pub async fn open_store(&self, config: &Config) -> anyhow::Result<VectorStore> {
        let mode: RankingMode = self.mode.parse()?;
        let data_dir = config.data_dir();

        let saved_file = self.saved_file.clone().unwrap_or_else(|| {
            data_dir.join(match mode {
                RankingMode::Dense => "dense.jsonl",
                RankingMode::Sparse => "sparse.jsonl",
            })
        });

        let options = StoreOptions::new(saved_file)
            .with_persist(!self.no_persist)
            .with_force_index(self.force_index);

        match mode {
            RankingMode::Sparse => {
                let metadata_file = self
                    .metadata_file
                    .clone()
                    .unwrap_or_else(|| data_dir.join("sparse_metadata.json"));
                let store = SparseStore::open(
                    options.with_metadata_file(metadata_file),
                    Box::new(WordTokenizer),
                )?;
                Ok(VectorStore::Sparse(store))
            }
            RankingMode::Dense => {
                let embedder = self.embedder(config).await?;
                Ok(VectorStore::Dense(DenseStore::open(options, embedder)?))
            }
        }
    }

    async fn embedder(
        &self,
        config: &Config,
    ) -> anyhow::Result<std::sync::Arc<dyn crate::embedding::Embedder>> {
        let provider = self
            .embedding_provider
            .clone()
            .unwrap_or_else(|| config.embedding.provider.clone());
        let model = self
            .embedding_model
            .clone()
            .unwrap_or_else(|| config.embedding.model.clone());

        let embedding_mode = match provider.as_str() {
            "ollama" => EmbeddingMode::Ollama {
                host: self.embedding_host.clone().or_else(|| config.embedding.host.clone()),
            },
            "openai" => EmbeddingMode::OpenAI {
                api_key: self
                    .embedding_api_key
                    .clone()
                    .or_else(|| config.embedding.api_key.clone()),
                base_url: self
                    .embedding_api_base
                    .clone()
                    .or_else(|| config.embedding.base_url.clone()),
            },
            other => anyhow::bail!("Unknown embedding provider: {}", other),
        };

        create_embedder(&model, embedding_mode).await
    }
}
