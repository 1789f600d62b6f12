/// Task model and database operations
///
/// Tasks are the core entity of taskhub. Each task is owned by exactly one
/// user (the owner never changes after creation) and may carry a weak
/// reference to one of that user's projects. The reference can be attached,
/// reattached, or cleared, but never point at another user's project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::task::{Task, CreateTask};
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, Uuid::new_v4(), CreateTask {
///     title: "Buy bread".to_string(),
///     description: "Go to the bakery".to_string(),
///     project_id: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has not been completed yet (default at creation)
    Pending,

    /// Task has been completed
    Completed,
}

impl TaskStatus {
    /// Converts status to its database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Current completion status
    pub status: TaskStatus,

    /// Owning user (never changes after creation)
    pub user_id: Uuid,

    /// Optional associated project, owned by the same user
    pub project_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Optional project to associate with; must be owned by the same user
    pub project_id: Option<Uuid>,
}

/// Sparse patch for updating a task
///
/// Field presence, not truthiness, decides what changes. In particular
/// `project_id` is a double option:
///
/// - field absent        → `None`               → association untouched
/// - field set to `null` → `Some(None)`         → detach from project
/// - field set to a UUID → `Some(Some(id))`     → attach after ownership check
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskPatch {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// Project association change (absent = leave untouched)
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub project_id: Option<Option<Uuid>>,
}

/// Deserializes a field so that an explicit `null` survives as `Some(None)`
///
/// Plain `Option<Option<T>>` would collapse `null` and a missing field into
/// the same value; wrapping the inner deserialization keeps them apart as
/// long as the field also carries `#[serde(default)]`.
fn deserialize_explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Task {
    /// Creates a new task in pending status
    ///
    /// The caller is responsible for resolving `project_id` with an
    /// owner-scoped lookup before passing it in.
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, user_id, project_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, user_id, project_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(user_id)
        .bind(data.project_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with owner scoping
    ///
    /// Returns `None` both when the task does not exist and when it is owned
    /// by a different user, so callers cannot probe for other tenants' tasks.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, user_id, project_id,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by `user_id`
    pub async fn find_all_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, user_id, project_id,
                   created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Overlays scalar patch fields onto this task in memory
    ///
    /// Handles title, description, and status. The project association is
    /// applied separately by the caller because it requires an owner-scoped
    /// project lookup first.
    pub fn apply_patch(&mut self, patch: &UpdateTaskPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    /// Persists the current mutable fields of this task
    pub async fn persist_update(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                project_id = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, user_id, project_id,
                      created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.status)
        .bind(self.project_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task with owner scoping
    ///
    /// Returns `true` if a row was deleted. A second delete of the same id
    /// returns `false` so callers report not-found, not silent success.
    pub async fn delete_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "Buy bread".to_string(),
            description: "Go to the bakery".to_string(),
            status: TaskStatus::Pending,
            user_id: Uuid::new_v4(),
            project_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_status_serde_is_lowercase() {
        let json = serde_json::to_value(TaskStatus::Completed).unwrap();
        assert_eq!(json, json!("completed"));

        let status: TaskStatus = serde_json::from_value(json!("pending")).unwrap();
        assert_eq!(status, TaskStatus::Pending);
    }

    #[test]
    fn test_patch_project_id_absent() {
        let patch: UpdateTaskPatch = serde_json::from_value(json!({
            "status": "completed"
        }))
        .unwrap();

        assert_eq!(patch.project_id, None);
        assert_eq!(patch.status, Some(TaskStatus::Completed));
    }

    #[test]
    fn test_patch_project_id_explicit_null() {
        let patch: UpdateTaskPatch = serde_json::from_value(json!({
            "project_id": null
        }))
        .unwrap();

        assert_eq!(patch.project_id, Some(None));
    }

    #[test]
    fn test_patch_project_id_with_value() {
        let id = Uuid::new_v4();
        let patch: UpdateTaskPatch = serde_json::from_value(json!({
            "project_id": id
        }))
        .unwrap();

        assert_eq!(patch.project_id, Some(Some(id)));
    }

    #[test]
    fn test_patch_rejects_overlong_title() {
        let patch = UpdateTaskPatch {
            title: Some("a".repeat(300)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_with_absent_fields_is_valid() {
        assert!(UpdateTaskPatch::default().validate().is_ok());

        let patch = UpdateTaskPatch {
            title: Some("Buy bread".to_string()),
            description: Some("Go to the bakery".to_string()),
            status: Some(TaskStatus::Completed),
            project_id: Some(None),
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_apply_patch_overlays_only_present_scalars() {
        let mut task = sample_task();
        let original_title = task.title.clone();
        let original_project = task.project_id;

        task.apply_patch(&UpdateTaskPatch {
            title: None,
            description: Some("New description".to_string()),
            status: Some(TaskStatus::Completed),
            project_id: None,
        });

        assert_eq!(task.title, original_title);
        assert_eq!(task.description, "New description");
        assert_eq!(task.status, TaskStatus::Completed);
        // apply_patch never touches the association
        assert_eq!(task.project_id, original_project);
    }
}
