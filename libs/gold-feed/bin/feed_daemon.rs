//! Price feed daemon: polls the upstream APIs and logs snapshot
//! changes until interrupted.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use gold_feed::domain::quote::Snapshot;
use gold_feed::{init_tracing, FeedConfig, PriceFeed, Shutdown, StateStore};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config_path =
        std::env::var("GOLD_FEED_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = FeedConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path}"))?;
    config.log();

    let store = Arc::new(StateStore::open(&config.state_dir));
    let (feed, mut state_rx) = PriceFeed::new(config, store, Snapshot::empty());

    let shutdown = Shutdown::new();
    let feed_task = tokio::spawn(feed.run(shutdown.clone()));

    let log_task = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update();
            info!(
                "state: {:?}, {} instruments, stale: {}",
                state.status,
                state.snapshot.prices.len(),
                state.is_stale
            );
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("waiting for ctrl-c")?;
    info!("shutting down");
    shutdown.trigger();

    feed_task.await.context("feed task panicked")?;
    log_task.abort();
    Ok(())
}
