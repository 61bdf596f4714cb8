// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use slanger_server::{
    api::router,
    config::{AppConfig, ConfigError},
    logging::init_logging,
    state::AppState,
    storage::{AccountDatabase, StoreError, TtlCache},
};
use tokio::net::TcpListener;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open account database: {0}")]
    Store(#[from] StoreError),
    #[error("invalid bind address {0}")]
    Address(String),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("slanger-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);
    tracing::info!(?config, "Configuration loaded");

    if config.app_secret.is_empty() {
        tracing::warn!("APP_SECRET is empty; every launch signature will be rejected");
    }

    let db_path = config.accounts_db_path();
    let accounts = Arc::new(AccountDatabase::open(&db_path)?);
    tracing::info!(path = %db_path.display(), "Account database opened");

    let cache = Arc::new(TtlCache::new(config.signature_cache_capacity));
    let state = AppState::new(&config, accounts, cache);
    let app = router(state);

    let bind = format!("{}:{}", config.host, config.port);
    let addr: SocketAddr = bind
        .parse()
        .map_err(|_| StartupError::Address(bind.clone()))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Slanger server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, draining connections");
}
