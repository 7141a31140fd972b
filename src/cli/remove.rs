//! Remove command - delete a node by id

use clap::Args;

use crate::config::Config;

use super::StoreArgs;

#[derive(Args)]
pub struct RemoveArgs {
    /// Node id to delete
    pub id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run(args: RemoveArgs) -> anyhow::Result<()> {
    let config = Config::load();
    let mut store = args.store.open_store(&config).await?;

    let existed = store.get(&args.id).is_some();
    store.delete(&args.id)?;

    if existed {
        println!("Removed `{}`. Store now holds {} nodes.", args.id, store.len());
    } else {
        println!("Node `{}` not found, nothing removed.", args.id);
    }

    Ok(())
}
