/// Notification stream consumer
///
/// Reads task-created events from the notification stream with blocking
/// XREAD and logs each receipt. The consumer is scheduled independently of
/// the API server and knows nothing about the publisher beyond the shared
/// stream key and event format; swapping the log line for real delivery
/// (push, email) is the intended extension point.
///
/// No acknowledgment is sent and no consumer group is used: delivery is
/// best-effort, and events published while the worker is down are skipped
/// (reading starts at the stream tail).
///
/// # Example
///
/// ```no_run
/// use taskhub_worker::consumer::NotificationConsumer;
/// use taskhub_shared::redis::{RedisClient, RedisConfig};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = RedisClient::new(RedisConfig::from_env()?).await?;
/// let consumer = NotificationConsumer::new(client);
///
/// let shutdown = CancellationToken::new();
/// consumer.run(shutdown).await?;
/// # Ok(())
/// # }
/// ```

use redis::streams::{StreamReadOptions, StreamReadReply};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use taskhub_shared::events::{deserialize_event, EventError, NOTIFICATION_STREAM_KEY};
use taskhub_shared::redis::{RedisClient, RedisClientError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Consumer errors
#[derive(Error, Debug)]
pub enum ConsumerError {
    /// Redis client error
    #[error("Redis error: {0}")]
    Redis(#[from] RedisClientError),

    /// Raw Redis command error
    #[error("Redis command error: {0}")]
    Command(#[from] redis::RedisError),

    /// Event could not be decoded
    #[error("Event decode error: {0}")]
    Decode(#[from] EventError),
}

/// Configuration for consumer polling behavior
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// How long each XREAD blocks waiting for new events (milliseconds)
    pub block_ms: usize,

    /// Maximum events to read per XREAD
    pub batch_size: usize,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            block_ms: 5_000,
            batch_size: 16,
        }
    }
}

/// Blocking consumer for the task-created notification stream
pub struct NotificationConsumer {
    client: RedisClient,
    config: ConsumerConfig,
}

impl NotificationConsumer {
    /// Creates a consumer with default polling configuration
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            config: ConsumerConfig::default(),
        }
    }

    /// Creates a consumer with custom polling configuration
    pub fn with_config(client: RedisClient, config: ConsumerConfig) -> Self {
        Self { client, config }
    }

    /// Runs the consume loop until the shutdown token is cancelled
    ///
    /// Transient Redis errors are logged and retried after a short pause;
    /// only cancellation ends the loop.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), ConsumerError> {
        // "$" = only events published after the consumer started
        let mut last_id = "$".to_string();

        tracing::info!(
            stream = NOTIFICATION_STREAM_KEY,
            "Notification worker is listening for task-created events"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notification consumer shutting down");
                    return Ok(());
                }
                result = self.read_batch(&last_id) => {
                    match result {
                        Ok(entries) => {
                            for (stream_id, fields) in entries {
                                self.handle_entry(&stream_id, &fields);
                                last_id = stream_id;
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to read notification stream");
                            tokio::time::sleep(Duration::from_secs(1)).await;
                        }
                    }
                }
            }
        }
    }

    /// Reads one batch of stream entries after `last_id`
    async fn read_batch(
        &self,
        last_id: &str,
    ) -> Result<Vec<(String, HashMap<String, String>)>, ConsumerError> {
        let mut conn = self.client.get_connection();

        let opts = StreamReadOptions::default()
            .count(self.config.batch_size)
            .block(self.config.block_ms);

        let reply: StreamReadReply = conn
            .xread_options(&[NOTIFICATION_STREAM_KEY], &[last_id], &opts)
            .await?;

        let mut entries = Vec::new();
        for stream_key in reply.keys {
            for entry in stream_key.ids {
                let mut fields = HashMap::new();
                for (field, value) in &entry.map {
                    let value: String = redis::from_redis_value(value)?;
                    fields.insert(field.clone(), value);
                }
                entries.push((entry.id, fields));
            }
        }

        Ok(entries)
    }

    /// Logs receipt of one event; malformed entries are logged and skipped
    fn handle_entry(&self, stream_id: &str, fields: &HashMap<String, String>) {
        match deserialize_event(fields) {
            Ok(event) => {
                tracing::info!(
                    stream_id = %stream_id,
                    task_id = %event.id,
                    user_id = %event.user_id,
                    title = %event.title,
                    "Task-created notification received"
                );
            }
            Err(e) => {
                tracing::warn!(
                    stream_id = %stream_id,
                    error = %e,
                    "Skipping malformed notification entry"
                );
            }
        }
    }
}
