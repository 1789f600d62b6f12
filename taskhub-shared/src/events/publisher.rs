/// Notification publisher for task-created events
///
/// Publishes events onto the notification stream with a single awaited XADD.
/// Best-effort by design: no retry, no dead-letter handling, no ordering
/// guarantee relative to other events for the same user, and no knowledge of
/// consumers. Callers decide whether a publish failure may fail their
/// operation; the task creation path logs and continues.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::events::{NotificationPublisher, TaskCreatedEvent};
/// use taskhub_shared::redis::{RedisClient, RedisConfig};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = RedisClient::new(RedisConfig::from_env()?).await?;
/// let publisher = NotificationPublisher::new(client);
///
/// publisher.notify_task_created(&TaskCreatedEvent {
///     id: Uuid::new_v4(),
///     title: "Buy bread".to_string(),
///     description: "Go to the bakery".to_string(),
///     user_id: Uuid::new_v4(),
///     created_at: Utc::now(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use super::{serialize_event, TaskCreatedEvent, NOTIFICATION_STREAM_KEY};
use crate::redis::{RedisClient, RedisClientError};
use redis::AsyncCommands;
use thiserror::Error;

/// Publisher errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Redis client error
    #[error("Redis error: {0}")]
    Redis(#[from] RedisClientError),

    /// Raw Redis command error
    #[error("Redis command error: {0}")]
    Command(#[from] redis::RedisError),
}

/// Fire-and-forget publisher for task-created notifications
#[derive(Clone)]
pub struct NotificationPublisher {
    client: RedisClient,
}

impl NotificationPublisher {
    /// Creates a new publisher over the shared Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Publishes a task-created event to the notification stream
    ///
    /// Awaited only for transport-level send confirmation; there is no
    /// consumer acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns an error if the XADD command fails.
    pub async fn notify_task_created(&self, event: &TaskCreatedEvent) -> Result<(), PublishError> {
        let mut conn = self.client.get_connection();

        let fields = serialize_event(event);
        let stream_id: String = conn.xadd(NOTIFICATION_STREAM_KEY, "*", &fields).await?;

        tracing::debug!(
            task_id = %event.id,
            user_id = %event.user_id,
            stream_id = %stream_id,
            "Task-created notification published"
        );

        Ok(())
    }
}
