//! ovg-api - Organization Vitality Grid service
//!
//! Serves survey analysis over HTTP. Starts empty unless both export paths
//! are given, in which case they are loaded before the listener opens.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ovg_api::api::buildinfo::BuildInfo;
use ovg_api::{build_router, AppState};
use ovg_common::config::load_config;
use ovg_engine::load_from_files;

/// Command-line arguments for ovg-api
#[derive(Parser, Debug)]
#[command(name = "ovg-api")]
#[command(about = "Organization vitality grid: engagement x stress survey analysis")]
#[command(version)]
struct Args {
    /// Config file (overrides OVG_CONFIG and the platform config file)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides [server].host)
    #[arg(long, env = "OVG_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides [server].port)
    #[arg(short, long, env = "OVG_PORT")]
    port: Option<u16>,

    /// Engagement survey export to preload
    #[arg(long, requires = "stress")]
    engagement: Option<PathBuf>,

    /// Stress-check export to preload
    #[arg(long, requires = "engagement")]
    stress: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so its log level can apply;
    // a load failure is reported once tracing is up
    let loaded = load_config(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    info!(
        "Starting Organization Vitality Grid (ovg-api) {}",
        BuildInfo::current()
    );

    let toml_config = loaded.context("Failed to load configuration")?;
    let analysis = toml_config
        .analysis_config()
        .context("Invalid analysis configuration")?;
    info!(
        engagement_threshold = analysis.engagement_threshold,
        stress_threshold = analysis.stress_threshold,
        factors = analysis.factors.len(),
        "Analysis configuration ready"
    );

    let state = AppState::new(analysis);

    if let (Some(engagement), Some(stress)) = (&args.engagement, &args.stress) {
        match load_from_files(engagement, stress, &state.config).await {
            Ok(dataset) => {
                state.replace_dataset(dataset).await;
            }
            Err(e) => {
                warn!("Preload failed, starting without a dataset: {}", e);
                state.record_error(e.to_string()).await;
            }
        }
    }

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr = format!("{}:{}", host, port);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("ovg-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
