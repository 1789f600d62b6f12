/// Task endpoints: the lifecycle, cache, and notification coordination core
///
/// Every operation is scoped to the authenticated owner. The write path runs
/// its steps in a fixed order with no transaction across collaborators:
///
/// ```text
/// store write → notification publish (create only) → cache invalidation
/// ```
///
/// The store write is authoritative. Notification publish and cache
/// invalidation are best-effort side effects: once the write has committed,
/// a failure in either is logged and the request still succeeds. The cache
/// TTL bounds staleness for the case where invalidation itself failed.
///
/// # Endpoints
///
/// - `POST /task` - Create (201, notifies + invalidates)
/// - `GET /task` - List (cache-first, `{tasks: [...]}`)
/// - `GET /task/:task_id` - Fetch one with its project loaded
/// - `PATCH /task/:task_id` - Sparse update (200)
/// - `DELETE /task/:task_id` - Delete (204)

use crate::{
    app::AppState,
    error::{found_or_404, ApiResult},
    routes::validate_request,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskhub_shared::auth::middleware::AuthContext;
use taskhub_shared::cache::TaskListing;
use taskhub_shared::events::TaskCreatedEvent;
use taskhub_shared::models::{
    project::Project,
    task::{CreateTask, Task, UpdateTaskPatch},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Task description
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    /// Optional project to associate; must belong to the caller
    pub project_id: Option<Uuid>,
}

/// Task listing response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    /// The caller's tasks, each with its project reduced to `{id}`
    pub tasks: Vec<TaskListing>,
}

/// Single task response with the project relation loaded
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// Associated project, if any
    pub project: Option<Project>,
}

/// Creates a task owned by the authenticated user
///
/// Resolves the owner and, when given, the project - both owner-scoped, so a
/// project belonging to another user is a 404 and nothing is persisted. After
/// the insert, publishes a task-created event and invalidates the owner's
/// cached listing; neither failure rolls back the insert.
///
/// # Errors
///
/// - `404 Not Found`: Owner absent, or project absent/owned by someone else
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    validate_request(&req)?;

    let user = found_or_404(User::find_by_id(&state.db, auth.user_id).await?, "User")?;

    let project_id = match req.project_id {
        Some(project_id) => {
            let project = found_or_404(
                Project::find_by_id_and_user(&state.db, project_id, user.id).await?,
                "Project",
            )?;
            Some(project.id)
        }
        None => None,
    };

    let task = Task::create(
        &state.db,
        user.id,
        CreateTask {
            title: req.title,
            description: req.description,
            project_id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, user_id = %user.id, "Task created");

    // Best-effort side effects: the task is already durable, so neither a
    // publish nor an invalidation failure fails the request.
    let event = TaskCreatedEvent {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        user_id: user.id,
        created_at: task.created_at,
    };
    if let Err(e) = state.notifier.notify_task_created(&event).await {
        tracing::warn!(task_id = %task.id, error = %e, "Task-created notification failed");
    }

    if let Err(e) = state.cache.invalidate(user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Cache invalidation failed");
    }

    Ok((StatusCode::CREATED, Json(task)))
}

/// Lists the authenticated user's tasks, cache-first
///
/// A cache hit returns the cached snapshot verbatim. On a miss the listing
/// is computed from the store, reduced (project → `{id}`), cached with the
/// configured TTL, and returned. A user with zero tasks gets `{tasks: []}`.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListTasksResponse>> {
    // A cache read failure is a miss, not a request failure
    match state.cache.get(auth.user_id).await {
        Ok(Some(tasks)) => return Ok(Json(ListTasksResponse { tasks })),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(user_id = %auth.user_id, error = %e, "Cache read failed");
        }
    }

    let tasks: Vec<TaskListing> = Task::find_all_by_user(&state.db, auth.user_id)
        .await?
        .iter()
        .map(TaskListing::from)
        .collect();

    if let Err(e) = state.cache.set(auth.user_id, &tasks).await {
        tracing::warn!(user_id = %auth.user_id, error = %e, "Cache population failed");
    }

    Ok(Json(ListTasksResponse { tasks }))
}

/// Fetches one task with its project relation loaded
///
/// # Errors
///
/// - `404 Not Found`: Absent or owned by a different user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = found_or_404(
        Task::find_by_id_and_user(&state.db, task_id, auth.user_id).await?,
        "Task",
    )?;

    let project = match task.project_id {
        Some(project_id) => Project::find_by_id_and_user(&state.db, project_id, auth.user_id).await?,
        None => None,
    };

    Ok(Json(TaskDetailResponse { task, project }))
}

/// Applies a sparse patch to a task
///
/// Presence of `project_id` in the body, not its value, decides whether the
/// association changes: omitted leaves it untouched, `null` detaches, a UUID
/// attaches after an owner-scoped project lookup. Scalar fields overlay only
/// when present. The owner's cached listing is invalidated afterwards.
///
/// # Errors
///
/// - `404 Not Found`: Task absent/foreign, or patch project absent/foreign
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(patch): Json<UpdateTaskPatch>,
) -> ApiResult<Json<Task>> {
    validate_request(&patch)?;

    let mut task = found_or_404(
        Task::find_by_id_and_user(&state.db, task_id, auth.user_id).await?,
        "Task",
    )?;

    match patch.project_id {
        None => {} // field omitted: association untouched
        Some(None) => task.project_id = None,
        Some(Some(project_id)) => {
            let project = found_or_404(
                Project::find_by_id_and_user(&state.db, project_id, auth.user_id).await?,
                "Project",
            )?;
            task.project_id = Some(project.id);
        }
    }

    task.apply_patch(&patch);

    let task = task.persist_update(&state.db).await?;

    if let Err(e) = state.cache.invalidate(auth.user_id).await {
        tracing::warn!(user_id = %auth.user_id, error = %e, "Cache invalidation failed");
    }

    Ok(Json(task))
}

/// Deletes a task
///
/// Deleting an already-removed task is a 404, not a silent success.
///
/// # Errors
///
/// - `404 Not Found`: Absent or owned by a different user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_by_id_and_user(&state.db, task_id, auth.user_id).await?;
    found_or_404(deleted.then_some(()), "Task")?;

    if let Err(e) = state.cache.invalidate(auth.user_id).await {
        tracing::warn!(user_id = %auth.user_id, error = %e, "Cache invalidation failed");
    }

    Ok(StatusCode::NO_CONTENT)
}
