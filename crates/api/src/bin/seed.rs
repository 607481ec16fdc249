//! Replace the configured store's products with the contents of a JSON file.
//!
//! Usage: `catalog-seed [path]`; the path defaults to `SEED_FILE`, then
//! `data/products.json`.

use std::path::PathBuf;

use anyhow::Context;

use catalog_infra::config::CatalogConfig;
use catalog_infra::{seed, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = CatalogConfig::from_env()?;
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.seed_file.clone())
        .unwrap_or_else(|| PathBuf::from("data/products.json"));

    let store = store::connect(&config.store)
        .await
        .context("failed to open product store")?;
    let inserted = seed::seed_store(store.as_ref(), &path).await?;

    tracing::info!(inserted, path = %path.display(), "database seeded");
    Ok(())
}
