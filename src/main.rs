//! ragstore - lightweight text-retrieval store for RAG
//!
//! One binary, two interchangeable ranking engines: dense cosine similarity
//! over embeddings, and sparse BM25+ lexical relevance.

mod cli;
mod config;
mod embedding;
mod store;
mod tokenizer;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragstore=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Parse CLI args and run
    let cli = Cli::parse();
    cli.run().await
}
