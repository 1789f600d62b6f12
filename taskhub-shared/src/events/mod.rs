/// Task-created notification events
///
/// When a task is created, the API publishes a `TaskCreatedEvent` onto a
/// named Redis Stream. The notification worker consumes the stream
/// independently; publisher and consumer share only this event type and the
/// stream key, never a direct reference to each other.
///
/// # Format
///
/// Redis Streams store entries as field-value string pairs:
/// ```text
/// id:          "550e8400-e29b-41d4-a716-446655440000"
/// title:       "Buy bread"
/// description: "Go to the bakery"
/// user_id:     "c0ffee00-..."
/// created_at:  "2024-01-15T12:00:00Z"
/// ```

pub mod publisher;

pub use publisher::{NotificationPublisher, PublishError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Stream key the task-created notifications are published to
pub const NOTIFICATION_STREAM_KEY: &str = "tasks:notifications";

/// Event serialization errors
#[derive(Error, Debug)]
pub enum EventError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid field value
    #[error("Invalid field value for {field}: {error}")]
    InvalidValue { field: String, error: String },

    /// UUID parsing error
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),

    /// Timestamp parsing error
    #[error("Timestamp error: {0}")]
    Timestamp(String),
}

/// Event emitted when a task is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCreatedEvent {
    /// ID of the created task
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Serializes an event to Redis Stream field-value pairs for XADD
pub fn serialize_event(event: &TaskCreatedEvent) -> Vec<(String, String)> {
    vec![
        ("id".to_string(), event.id.to_string()),
        ("title".to_string(), event.title.clone()),
        ("description".to_string(), event.description.clone()),
        ("user_id".to_string(), event.user_id.to_string()),
        ("created_at".to_string(), event.created_at.to_rfc3339()),
    ]
}

/// Deserializes an event from Redis Stream field-value pairs
///
/// # Errors
///
/// Returns an error if a required field is missing or malformed.
pub fn deserialize_event(fields: &HashMap<String, String>) -> Result<TaskCreatedEvent, EventError> {
    let get = |name: &str| {
        fields
            .get(name)
            .cloned()
            .ok_or_else(|| EventError::MissingField(name.to_string()))
    };

    let id = Uuid::parse_str(&get("id")?)?;
    let user_id = Uuid::parse_str(&get("user_id")?)?;

    let created_at = DateTime::parse_from_rfc3339(&get("created_at")?)
        .map_err(|e| EventError::Timestamp(e.to_string()))?
        .with_timezone(&Utc);

    Ok(TaskCreatedEvent {
        id,
        title: get("title")?,
        description: get("description")?,
        user_id,
        created_at,
    })
}
