//! fb-rv (Review service) - Main entry point
//!
//! Serves the review submission and listing API used by the feedback form and
//! the admin dashboard.

use anyhow::{Context, Result};
use clap::Parser;
use fb_common::config::{CliOverrides, ServiceConfig, TomlConfig};
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

use fb_rv::analysis::build_analyzer;
use fb_rv::db::{init_database_pool, ReviewStore};
use fb_rv::{build_router, AppState};

/// Command-line arguments for fb-rv
#[derive(Parser, Debug)]
#[command(name = "fb-rv")]
#[command(about = "Review submission and listing service")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/feedback/config.toml if present)
    #[arg(short, long, env = "FB_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (host:port)
    #[arg(short, long, env = "FB_BIND")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "FB_DATABASE")]
    database: Option<PathBuf>,

    /// Text-generation API key; without one, reviews are analyzed by rating rules
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())?;
    let config = ServiceConfig::resolve(
        toml_config,
        CliOverrides {
            bind: args.bind,
            database_path: args.database,
            api_key: args.openai_api_key,
        },
    );

    fb_common::logging::init_tracing(&config.logging.level)?;

    info!(
        "Starting fb-rv (Review service) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!("Database: {}", config.database_path.display());
    let pool = init_database_pool(&config.database_path)
        .await
        .context("Failed to open review database")?;
    info!("Database connection established");

    let analyzer = build_analyzer(&config.analysis).context("Failed to set up review analysis")?;

    let state = AppState::new(analyzer, ReviewStore::new(pool.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("fb-rv stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
