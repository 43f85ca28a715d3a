//! Project HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::access::{load_project, require_member, require_owner};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{AddMemberRequest, CreateProjectRequest, Project, UpdateProjectRequest};

/// Create a project owned by the caller
pub async fn create_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = Project::new(user.user_id, request)?;
    state.store.insert_project(&project).await?;

    tracing::info!("[Projects] {} created '{}' ({})", user.username, project.title, project.id);
    Ok((StatusCode::CREATED, Json(project)))
}

/// List the caller's projects, newest first
pub async fn list_projects(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.store.projects_for_member(user.user_id).await?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = load_project(&state, project_id).await?;
    require_member(&project, &user)?;
    Ok(Json(project))
}

/// Update title, description, status or due date (owner only)
pub async fn update_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let mut project = load_project(&state, project_id).await?;
    require_owner(&project, &user)?;

    project.apply_update(request)?;
    state.store.update_project(&project).await?;

    tracing::info!("[Projects] {} updated {}", user.username, project.id);
    Ok(Json(project))
}

/// Delete a project and all of its tasks (owner only)
pub async fn delete_project(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let project = load_project(&state, project_id).await?;
    require_owner(&project, &user)?;

    let tasks = state.store.delete_project(project_id).await?;

    tracing::info!(
        "[Projects] {} deleted {} with {} tasks",
        user.username,
        project_id,
        tasks
    );
    Ok(Json(json!({ "message": "Project removed" })))
}

/// Add a user to the project (owner only)
///
/// # Errors
///
/// * `400 Bad Request` - the user is already a member
/// * `404 Not Found` - the project or the user does not exist
pub async fn add_member(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> ApiResult<Json<Project>> {
    let project = load_project(&state, project_id).await?;
    require_owner(&project, &user)?;

    if state.store.user_by_id(request.user_id).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    if project.is_member(request.user_id) {
        return Err(BackendError::bad_request("User is already a member"));
    }

    let project = state.store.add_member(project_id, request.user_id).await?;

    tracing::info!(
        "[Projects] {} added {} to {} ({} members)",
        user.username,
        request.user_id,
        project_id,
        project.members.len()
    );
    Ok(Json(project))
}
