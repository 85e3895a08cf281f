//! fb-dash (Review dashboard) - Main entry point
//!
//! Prints the review table each time the poller fetches a new snapshot.
//! Ctrl-C stops the poller and exits.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use fb_dash::{build_banner, render_snapshot, spawn_poller, ReviewsClient};

/// Command-line arguments for fb-dash
#[derive(Parser, Debug)]
#[command(name = "fb-dash")]
#[command(about = "Terminal dashboard for submitted reviews")]
#[command(version)]
struct Args {
    /// Base URL of the review service
    #[arg(long, default_value = "http://127.0.0.1:4000", env = "FB_API_URL")]
    api_url: String,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 10)]
    interval_secs: u64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    fb_common::logging::init_tracing(&args.log_level)?;

    info!("Starting {}", build_banner());

    let client = ReviewsClient::new(&args.api_url, Duration::from_secs(args.timeout_secs))
        .context("Failed to create HTTP client")?;
    info!("Polling {} every {}s", client.endpoint(), args.interval_secs);

    let cancel = CancellationToken::new();
    let (poller, mut snapshots) = spawn_poller(
        client,
        Duration::from_secs(args.interval_secs.max(1)),
        cancel.clone(),
    );

    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = render_snapshot(&snapshots.borrow_and_update());
                println!("{}", text);
            }
        }
    }

    cancel.cancel();
    poller.await.context("Review poller task failed")?;
    info!("fb-dash stopped");

    Ok(())
}
