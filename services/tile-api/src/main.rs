//! Weather tile server.
//!
//! Serves slippy-map tiles showing current temperature, conditions and wind
//! direction at each tile's north-west corner.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tile_api::build_router;
use tile_api::cleanup::spawn_cache_purge;
use tile_api::config::{Args, Config};
use tile_api::state::AppState;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).with_target(true).json().init();

    let config = Config::from_args(&args).context("Invalid configuration")?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        info!("Configuring tokio runtime with {} worker threads", threads);
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<()> {
    let prometheus_handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            info!("Prometheus metrics exporter initialized");
            Some(handle)
        }
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    };

    info!(config = ?config, "Starting weather tile server");

    let state = Arc::new(AppState::new(&config, prometheus_handle).context("Failed to build weather client")?);
    let purge = spawn_cache_purge(state.weather.cache().clone(), config.cache_ttl);

    let app = build_router(state);

    info!(address = %config.listen, "Listening");
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    purge.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
