use std::sync::Arc;

use anyhow::{bail, Context};

use ttrpg_catalog::config::AppConfig;
use ttrpg_catalog::core::catalog::{CatalogLoader, FsContentProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, origin) = AppConfig::read(&AppConfig::config_path());

    // Initialize logging
    let _log_guard = ttrpg_catalog::core::logging::init(&config.logging);
    log::info!("{} v{} starting", ttrpg_catalog::NAME, ttrpg_catalog::VERSION);
    origin.log();

    let data_dir = config.catalog.data_dir();
    if !data_dir.is_dir() {
        bail!("content root {} does not exist", data_dir.display());
    }

    let loader = CatalogLoader::new(Arc::new(FsContentProvider::new(&data_dir)))
        .with_concurrency(config.catalog.read_concurrency());
    let catalog = Arc::new(loader.load(config.catalog.homebrew_path.as_deref()).await);

    let stats = catalog.stats();
    for (kind, count) in &stats.by_kind {
        log::info!("{kind}: {count}");
    }

    let summary = serde_json::to_string_pretty(&stats).context("serializing catalog statistics")?;
    println!("{summary}");

    Ok(())
}
