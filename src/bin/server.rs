//! OwwJurnal HTTP server
//!
//! Serves both functions locally. Configuration is read from
//! `OWWJURNAL_CONFIG` (default `data/config.toml`).

use std::net::SocketAddr;
use std::sync::Arc;

use owwjurnal::{
    error::{AppError, Result},
    functions::Functions,
    models::{Config, StorageBackend},
    server::build_router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path =
        std::env::var("OWWJURNAL_CONFIG").unwrap_or_else(|_| "data/config.toml".to_string());
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("OwwJurnal server starting...");

    let functions = Arc::new(Functions::from_config(&config).await?);
    let illustrations_dir = match config.storage.backend {
        StorageBackend::Local => Some(config.storage.root_dir.as_path()),
        StorageBackend::S3 => None,
    };
    let app = build_router(functions, illustrations_dir);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| AppError::config(format!("invalid listen address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
