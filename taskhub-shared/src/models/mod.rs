/// Database models for taskhub
///
/// This module contains the three persisted entities and their CRUD
/// operations. Every lookup that serves an authenticated request is
/// owner-scoped: filtered by both the resource id and the owning user id, so
/// that a missing resource and another user's resource are indistinguishable
/// to the caller.
///
/// # Models
///
/// - `user`: User accounts (created at sign-up, never hard-deleted here)
/// - `project`: Projects owned by a user, cascade-deleting their tasks
/// - `task`: Tasks owned by a user, optionally associated with a project
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::user::{User, CreateUser};
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod task;
pub mod user;
