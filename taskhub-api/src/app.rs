/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::AppState, config::Config};
/// use taskhub_shared::cache::TaskListingCache;
/// use taskhub_shared::events::NotificationPublisher;
/// use taskhub_shared::redis::{RedisClient, RedisConfig};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let redis = RedisClient::new(RedisConfig::from_env()?).await?;
/// let cache = TaskListingCache::new(redis.clone(), config.cache.task_ttl_secs);
/// let notifier = NotificationPublisher::new(redis);
/// let state = AppState::new(pool, cache, notifier, config);
/// let app = taskhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhub_shared::auth::{jwt, middleware::AuthContext};
use taskhub_shared::cache::TaskListingCache;
use taskhub_shared::events::NotificationPublisher;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. All members
/// are connection-pool-like handles that are cheap to clone and safe for
/// concurrent use; no other state is shared between requests.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Per-user task listing cache
    pub cache: TaskListingCache,

    /// Task-created notification publisher
    pub notifier: NotificationPublisher,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        db: PgPool,
        cache: TaskListingCache,
        notifier: NotificationPublisher,
        config: Config,
    ) -> Self {
        Self {
            db,
            cache,
            notifier,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                    # Health check (public)
/// ├── /auth/
/// │   ├── POST /sign-up          # Create account, returns access token
/// │   └── POST /sign-in          # Returns access token
/// ├── /task                      # Authenticated
/// │   ├── POST   /               # Create task (notifies + invalidates cache)
/// │   ├── GET    /               # List tasks (cache-first)
/// │   ├── GET    /:task_id
/// │   ├── PATCH  /:task_id
/// │   └── DELETE /:task_id       # 204
/// └── /project                   # Authenticated
///     ├── POST   /
///     ├── GET    /
///     ├── GET    /:project_id
///     ├── PATCH  /:project_id
///     └── DELETE /:project_id    # 204, cascades tasks
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/sign-up", post(routes::auth::sign_up))
        .route("/sign-in", post(routes::auth::sign_in));

    // Task routes (require JWT authentication)
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:task_id", get(routes::tasks::get_task))
        .route("/:task_id", patch(routes::tasks::update_task))
        .route("/:task_id", delete(routes::tasks::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Project routes (require JWT authentication)
    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:project_id", get(routes::projects::get_project))
        .route("/:project_id", patch(routes::projects::update_project))
        .route("/:project_id", delete(routes::projects::delete_project))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/task", task_routes)
        .nest("/project", project_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization header,
/// then injects `AuthContext` into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut()
        .insert(AuthContext::from_claims(claims.sub));

    Ok(next.run(req).await)
}
