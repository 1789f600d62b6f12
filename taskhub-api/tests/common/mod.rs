/// Common test utilities for integration tests
///
/// Shared infrastructure for the API integration suite:
/// - Test database setup (migrations run on first use)
/// - Test Redis connection
/// - Test user creation and JWT token generation
/// - Router call helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::Config;
use taskhub_shared::auth::jwt::{create_token, Claims};
use taskhub_shared::cache::TaskListingCache;
use taskhub_shared::events::NotificationPublisher;
use taskhub_shared::models::user::{CreateUser, User};
use taskhub_shared::redis::{RedisClient, RedisConfig};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub redis: RedisClient,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to this crate's Cargo.toml)
        sqlx::migrate!("../taskhub-shared/migrations").run(&db).await?;

        let redis = RedisClient::new(RedisConfig::from_env()?).await?;
        let cache = TaskListingCache::new(redis.clone(), config.cache.task_ttl_secs);
        let notifier = NotificationPublisher::new(redis.clone());

        let user = create_test_user(&db).await?;
        let jwt_token = create_token(&Claims::new(user.id), &config.jwt.secret)?;

        let state = AppState::new(db.clone(), cache, notifier, config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            redis,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Creates a second, independent user with their own token
    pub async fn other_user(&self) -> anyhow::Result<(User, String)> {
        let user = create_test_user(&self.db).await?;
        let token = create_token(&Claims::new(user.id), &self.config.jwt.secret)?;
        Ok((user, token))
    }

    /// Calls the router with an authenticated JSON request
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token));

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).unwrap();
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Checks whether the task listing cache key exists for a user
    pub async fn cache_key_exists(&self, user_id: Uuid) -> anyhow::Result<bool> {
        use redis::AsyncCommands;
        let mut conn = self.redis.get_connection();
        let exists: bool = conn.exists(TaskListingCache::key(user_id)).await?;
        Ok(exists)
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to their projects and tasks.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Creates a user with a unique email directly in the store
pub async fn create_test_user(db: &PgPool) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            name: "Test User".to_string(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$not-used-in-tests".to_string(),
        },
    )
    .await?;

    Ok(user)
}
