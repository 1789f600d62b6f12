/// Project model and database operations
///
/// Projects group tasks for a single owner. All lookups that serve
/// authenticated requests are owner-scoped: filtering by `(id, user_id)`
/// collapses "does not exist" and "belongs to someone else" into a single
/// not-found outcome, so tenant existence never leaks across accounts.
///
/// Deleting a project deletes its tasks through the `tasks.project_id`
/// foreign key cascade; the service layer does not re-implement that rule.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user
    pub user_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Sparse patch for updating a project
///
/// Only fields present in the patch are overlaid onto the stored project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectPatch {
    /// New project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

impl Project {
    /// Creates a new project owned by `user_id`
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID with owner scoping
    ///
    /// Returns `None` both when the project does not exist and when it is
    /// owned by a different user.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects owned by `user_id`
    pub async fn find_all_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Overlays patch fields onto this project in memory
    ///
    /// Fields absent from the patch keep their current value.
    pub fn apply_patch(&mut self, patch: &UpdateProjectPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = Some(description.clone());
        }
    }

    /// Persists the current name and description of this project
    pub async fn persist_update(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.description)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project with owner scoping
    ///
    /// Associated tasks are removed by the foreign key cascade. Returns
    /// `true` if a row was deleted; a second delete of the same id returns
    /// `false` so callers can report not-found rather than silent success.
    pub async fn delete_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM projects
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

    fn sample_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Work".to_string(),
            description: None,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_patch_overlays_present_fields() {
        let mut project = sample_project();
        project.apply_patch(&UpdateProjectPatch {
            name: Some("Renamed".to_string()),
            description: Some("plan".to_string()),
        });

        assert_eq!(project.name, "Renamed");
        assert_eq!(project.description.as_deref(), Some("plan"));
    }

    #[test]
    fn test_patch_rejects_overlong_name() {
        let patch = UpdateProjectPatch {
            name: Some("a".repeat(300)),
            description: None,
        };
        assert!(patch.validate().is_err());

        assert!(UpdateProjectPatch::default().validate().is_ok());
    }

    #[test]
    fn test_apply_patch_keeps_absent_fields() {
        let mut project = sample_project();
        project.description = Some("original".to_string());

        project.apply_patch(&UpdateProjectPatch::default());

        assert_eq!(project.name, "Work");
        assert_eq!(project.description.as_deref(), Some("original"));
    }
}
