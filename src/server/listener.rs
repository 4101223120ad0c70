use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionConfig};
use crate::http::framer::FrameLimits;
use crate::router::Router;
use crate::store::ContentStore;

/// Binds the configured address and serves until the task is dropped.
pub async fn run<S: ContentStore>(cfg: &Config, store: Arc<S>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    let router = Arc::new(Router::new(store, cfg.store.protected.clone()));
    serve(listener, router, connection_config(cfg)).await
}

/// Accept loop over an already bound listener.
///
/// Every accepted socket gets its own task. Failures on one connection,
/// including a failed accept, never stop the loop.
pub async fn serve<S: ContentStore>(
    listener: TcpListener,
    router: Arc<Router<S>>,
    config: ConnectionConfig,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router, config);
            match conn.run().await {
                Ok(reason) => info!(%peer, ?reason, "Connection closed"),
                Err(e) => tracing::error!("Connection error from {}: {}", peer, e),
            }
        });
    }
}

pub fn connection_config(cfg: &Config) -> ConnectionConfig {
    ConnectionConfig {
        idle_timeout: cfg.server.idle_timeout(),
        limits: FrameLimits {
            max_header_bytes: cfg.server.max_header_bytes,
            max_body_bytes: cfg.server.max_body_bytes,
        },
    }
}
