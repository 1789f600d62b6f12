//! # Taskhub Notification Worker
//!
//! Standalone consumer for task-created notification events. Reads the
//! notification stream published by the API server and logs each receipt.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhub-worker
//! ```

use taskhub_shared::redis::{RedisClient, RedisConfig};
use taskhub_worker::consumer::NotificationConsumer;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskhub Notification Worker v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let redis = RedisClient::new(RedisConfig::from_env()?).await?;
    let consumer = NotificationConsumer::new(redis);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
        signal_token.cancel();
    });

    consumer.run(shutdown).await?;

    Ok(())
}
