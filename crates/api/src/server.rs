//! Server bootstrap: store selection, optional seeding, bind and graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use catalog_infra::config::CatalogConfig;
use catalog_infra::seed;
use catalog_infra::store::{self, ProductStore};

/// Open the configured store and seed it when `SEED_FILE` is set.
pub async fn open_store(config: &CatalogConfig) -> anyhow::Result<Arc<dyn ProductStore>> {
    let store = store::connect(&config.store)
        .await
        .context("failed to open product store")?;

    if let Some(path) = &config.seed_file {
        seed::seed_store(store.as_ref(), path)
            .await
            .with_context(|| format!("failed to seed from {}", path.display()))?;
    }

    Ok(store)
}

pub async fn run(config: CatalogConfig) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let app = crate::app::build_app(store, &config);

    let address = config.socket_addr();
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
