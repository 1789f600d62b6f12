/// Project endpoints
///
/// The same owner-scoping pattern as the task endpoints, without the cache
/// or notification concerns. Deleting a project removes its tasks through
/// the store's referential-integrity cascade.
///
/// # Endpoints
///
/// - `POST /project` - Create (201)
/// - `GET /project` - List (`{projects: [...]}`)
/// - `GET /project/:project_id`
/// - `PATCH /project/:project_id` - Overlay merge of name/description
/// - `DELETE /project/:project_id` - Delete (204), cascades tasks

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
use taskhub_shared::models::{
    project::{CreateProject, Project, UpdateProjectPatch},
    user::User,
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Project listing response
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    /// The caller's projects
    pub projects: Vec<Project>,
}

/// Creates a project owned by the authenticated user
///
/// # Errors
///
/// - `404 Not Found`: Owner absent
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    validate_request(&req)?;

    let user = found_or_404(User::find_by_id(&state.db, auth.user_id).await?, "User")?;

    let project = Project::create(
        &state.db,
        user.id,
        CreateProject {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, user_id = %user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Lists the authenticated user's projects
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListProjectsResponse>> {
    let projects = Project::find_all_by_user(&state.db, auth.user_id).await?;

    Ok(Json(ListProjectsResponse { projects }))
}

/// Fetches one project
///
/// # Errors
///
/// - `404 Not Found`: Absent or owned by a different user
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = found_or_404(
        Project::find_by_id_and_user(&state.db, project_id, auth.user_id).await?,
        "Project",
    )?;

    Ok(Json(project))
}

/// Applies a sparse patch to a project (name and/or description)
///
/// # Errors
///
/// - `404 Not Found`: Absent or owned by a different user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Json(patch): Json<UpdateProjectPatch>,
) -> ApiResult<Json<Project>> {
    validate_request(&patch)?;

    let mut project = found_or_404(
        Project::find_by_id_and_user(&state.db, project_id, auth.user_id).await?,
        "Project",
    )?;

    project.apply_patch(&patch);
    let project = project.persist_update(&state.db).await?;

    Ok(Json(project))
}

/// Deletes a project and, via the store cascade, its tasks
///
/// # Errors
///
/// - `404 Not Found`: Absent or owned by a different user
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Project::delete_by_id_and_user(&state.db, project_id, auth.user_id).await?;
    found_or_404(deleted.then_some(()), "Project")?;

    tracing::info!(project_id = %project_id, user_id = %auth.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}
