//! Index command - add passages to a store

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::store::Node;

use super::StoreArgs;

#[derive(Args)]
pub struct IndexArgs {
    /// JSONL passages file, one {"id", "text", "metadata"} object per line
    /// (id and metadata optional)
    pub passages: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// One input row; rows without an id get their ordinal position
#[derive(Deserialize)]
struct PassageRow {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    metadata: serde_json::Value,
}

pub async fn run(args: IndexArgs) -> anyhow::Result<()> {
    let config = Config::load();
    let mut store = args.store.open_store(&config).await?;

    let rows = read_passages(&args.passages)?;
    if rows.is_empty() {
        anyhow::bail!("No passages found in {}", args.passages.display());
    }

    let next_ordinal = store.len();
    let nodes: Vec<Node> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let id = row
                .id
                .unwrap_or_else(|| (next_ordinal + i).to_string());
            Node::new(id, row.text).with_metadata(row.metadata)
        })
        .collect();

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    progress.set_message(format!("Indexing {} passages...", nodes.len()));

    let ids = store.add(nodes).await?;
    progress.finish_with_message(format!("Indexed {} passages", ids.len()));

    info!("Store now holds {} nodes", store.len());
    Ok(())
}

fn read_passages(path: &PathBuf) -> anyhow::Result<Vec<PassageRow>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(&line)?);
    }
    Ok(rows)
}
