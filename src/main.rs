use std::sync::Arc;

use filament::config::Config;
use filament::server;
use filament::store::{DirStore, LockedStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::load()?;

    let dir = DirStore::open(&cfg.store.root).await?;
    tracing::info!(root = %dir.root().display(), "Serving content store");
    let store = Arc::new(LockedStore::new(dir));

    tokio::select! {
        res = server::run(&cfg, store) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
