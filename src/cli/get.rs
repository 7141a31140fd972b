//! Get command - fetch a single node by id

use clap::Args;

use crate::config::Config;

use super::StoreArgs;

#[derive(Args)]
pub struct GetArgs {
    /// Node id to fetch
    pub id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run(args: GetArgs) -> anyhow::Result<()> {
    let config = Config::load();
    let store = args.store.open_store(&config).await?;

    match store.get(&args.id) {
        Some(node) => println!("{}", serde_json::to_string_pretty(node)?),
        None => println!("Node `{}` not found.", args.id),
    }

    Ok(())
}
