//! # Taskhub API Server
//!
//! HTTP server for the taskhub task/project backend. Provides
//! authentication, owner-scoped task and project CRUD, a cache-first task
//! listing, and best-effort task-created notifications.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhub-api
//! ```

use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::Config;
use taskhub_shared::cache::TaskListingCache;
use taskhub_shared::db::{create_pool, run_migrations, DatabaseConfig};
use taskhub_shared::events::NotificationPublisher;
use taskhub_shared::redis::{RedisClient, RedisConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskhub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let redis = RedisClient::new(RedisConfig::from_env()?).await?;
    let cache = TaskListingCache::new(redis.clone(), config.cache.task_ttl_secs);
    let notifier = NotificationPublisher::new(redis);

    let bind_address = config.bind_address();
    let state = AppState::new(db, cache, notifier, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
