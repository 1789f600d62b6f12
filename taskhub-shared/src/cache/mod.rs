/// Per-user task listing cache
///
/// Caches the reduced task listing served by `GET /task` under one key per
/// user. The cache is a performance hint, never an authority: every mutation
/// of a user's tasks invalidates the whole listing (no per-task entries), and
/// a short TTL bounds staleness even when invalidation itself fails.
///
/// # Key Derivation
///
/// Keys are a deterministic function of the owning user and the resource
/// kind: `tasks:{user_id}`.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::cache::TaskListingCache;
/// use taskhub_shared::redis::{RedisClient, RedisConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = RedisClient::new(RedisConfig::from_env()?).await?;
/// let cache = TaskListingCache::new(client, 60);
///
/// let user_id = Uuid::new_v4();
/// if let Some(listing) = cache.get(user_id).await? {
///     println!("cache hit: {} tasks", listing.len());
/// }
/// # Ok(())
/// # }
/// ```

use crate::models::task::{Task, TaskStatus};
use crate::redis::{RedisClient, RedisClientError};
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default listing TTL in seconds
pub const DEFAULT_TASK_TTL_SECS: u64 = 60;

/// Cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Redis client error
    #[error("Redis error: {0}")]
    Redis(#[from] RedisClientError),

    /// Raw Redis command error
    #[error("Redis command error: {0}")]
    Command(#[from] redis::RedisError),

    /// Cached value could not be decoded
    #[error("Cache decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Project reference reduced to its id, as exposed in task listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project ID
    pub id: Uuid,
}

/// One entry of the per-user task listing
///
/// Carries the full task fields; only the associated project is reduced to
/// its id rather than the full nested payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListing {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Completion status
    pub status: TaskStatus,

    /// Owning user
    pub user_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,

    /// Associated project, reduced to `{id}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

impl From<&Task> for TaskListing {
    fn from(task: &Task) -> Self {
        TaskListing {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            user_id: task.user_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
            project: task.project_id.map(|id| ProjectRef { id }),
        }
    }
}

/// Per-user task listing cache backed by Redis
///
/// Cloning is cheap; the underlying client is shared.
#[derive(Clone)]
pub struct TaskListingCache {
    client: RedisClient,
    ttl_secs: u64,
}

impl TaskListingCache {
    /// Creates a new listing cache with the given TTL
    pub fn new(client: RedisClient, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    /// Derives the cache key for a user's task listing
    pub fn key(user_id: Uuid) -> String {
        format!("tasks:{}", user_id)
    }

    /// Returns the cached listing for a user, if present and decodable
    pub async fn get(&self, user_id: Uuid) -> Result<Option<Vec<TaskListing>>, CacheError> {
        let mut conn = self.client.get_connection();

        let raw: Option<String> = conn.get(Self::key(user_id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Stores a listing snapshot for a user with the configured TTL
    pub async fn set(&self, user_id: Uuid, listing: &[TaskListing]) -> Result<(), CacheError> {
        let mut conn = self.client.get_connection();

        let json = serde_json::to_string(listing)?;
        let _: () = conn
            .set_ex(Self::key(user_id), json, self.ttl_secs)
            .await?;

        tracing::debug!(user_id = %user_id, entries = listing.len(), "Task listing cached");
        Ok(())
    }

    /// Drops the cached listing for a user
    ///
    /// The next read recomputes from the authoritative store. Deleting an
    /// absent key is a no-op, so invalidation is idempotent.
    pub async fn invalidate(&self, user_id: Uuid) -> Result<(), CacheError> {
        let mut conn = self.client.get_connection();

        let _: i64 = conn.del(Self::key(user_id)).await?;

        tracing::debug!(user_id = %user_id, "Task listing cache invalidated");
        Ok(())
    }
}
