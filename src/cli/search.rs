//! Search command - query a store

use clap::Args;

use crate::config::Config;
use crate::store::QueryResult;

use super::StoreArgs;

#[derive(Args)]
pub struct SearchArgs {
    /// One or more queries; several run as an order-preserving batch
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Number of results per query
    #[arg(long, short = 'k', default_value = "3")]
    pub top_k: usize,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = Config::load();
    let store = args.store.open_store(&config).await?;

    let results = store.batch_query(&args.queries, args.top_k).await?;

    for (query, result) in args.queries.iter().zip(&results) {
        match args.format.as_str() {
            "json" => print_json(query, result)?,
            _ => print_text(query, result),
        }
    }

    Ok(())
}

fn print_text(query: &str, result: &QueryResult) {
    println!("Query: {}", query);
    if result.is_empty() {
        println!("  (no results)");
        return;
    }
    for (rank, ((node, score), id)) in result
        .nodes
        .iter()
        .zip(&result.scores)
        .zip(&result.ids)
        .enumerate()
    {
        let preview: String = node.text.chars().take(120).collect();
        println!("  {}. [{}] score={:.4} {}", rank + 1, id, score, preview);
    }
}

fn print_json(query: &str, result: &QueryResult) -> anyhow::Result<()> {
    let rows: Vec<serde_json::Value> = result
        .nodes
        .iter()
        .zip(&result.scores)
        .map(|(node, score)| {
            serde_json::json!({
                "id": node.id,
                "score": score,
                "text": node.text,
                "metadata": node.metadata,
            })
        })
        .collect();

    let out = serde_json::json!({ "query": query, "results": rows });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
