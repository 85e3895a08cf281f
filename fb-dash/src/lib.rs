//! fb-dash library - Review dashboard
//!
//! Polls the review service's `GET /api/reviews` on a fixed interval and
//! publishes each outcome as a [`Snapshot`] on a watch channel. The poller is
//! a standalone task stopped through a [`CancellationToken`].

pub mod render;

pub use render::{render_snapshot, render_table};

use chrono::{DateTime, Utc};
use fb_common::{Envelope, ReviewRecord};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("fb-dash/", env!("CARGO_PKG_VERSION"));

/// Startup banner: version, git hash, build timestamp, build profile
pub fn build_banner() -> String {
    format!(
        "fb-dash (Review dashboard) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    )
}

/// Dashboard errors
#[derive(Debug, Error)]
pub enum DashError {
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered with an error envelope
    #[error("{0}")]
    Api(String),

    /// Response was neither envelope shape
    #[error("Unexpected response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Client for the review listing endpoint
#[derive(Debug, Clone)]
pub struct ReviewsClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl ReviewsClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, DashError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DashError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/reviews", api_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch every stored review, newest first
    pub async fn fetch(&self) -> Result<Vec<ReviewRecord>, DashError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| DashError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DashError::Network(e.to_string()))?;

        let envelope: Envelope<Vec<ReviewRecord>> =
            serde_json::from_slice(&bytes).map_err(|e| DashError::Decode {
                status,
                message: e.to_string(),
            })?;

        envelope.into_result().map_err(DashError::Api)
    }
}

/// Latest poll outcome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Reviews from the last successful fetch
    pub reviews: Vec<ReviewRecord>,
    /// Error from the last fetch, if it failed
    pub error: Option<String>,
    /// When the last fetch finished; `None` until the first one does
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Fold one fetch outcome in; a failure keeps the previous reviews
    pub fn apply(&mut self, outcome: Result<Vec<ReviewRecord>, DashError>, at: DateTime<Utc>) {
        match outcome {
            Ok(reviews) => {
                self.reviews = reviews;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        self.fetched_at = Some(at);
    }
}

/// Poll until cancelled, publishing every outcome to `tx`
///
/// The first fetch happens immediately. Cancellation also interrupts a fetch
/// in flight.
pub async fn run_poller(
    client: ReviewsClient,
    period: Duration,
    cancel: CancellationToken,
    tx: watch::Sender<Snapshot>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = client.fetch() => outcome,
        };

        match &outcome {
            Ok(reviews) => debug!(count = reviews.len(), "Fetched reviews"),
            Err(e) => warn!(error = %e, endpoint = client.endpoint(), "Review fetch failed"),
        }

        tx.send_modify(|snapshot| snapshot.apply(outcome, Utc::now()));
    }

    debug!("Review poller stopped");
}

/// Spawn [`run_poller`] on the runtime
pub fn spawn_poller(
    client: ReviewsClient,
    period: Duration,
    cancel: CancellationToken,
) -> (JoinHandle<()>, watch::Receiver<Snapshot>) {
    let (tx, rx) = watch::channel(Snapshot::default());
    let handle = tokio::spawn(run_poller(client, period, cancel, tx));
    (handle, rx)
}
