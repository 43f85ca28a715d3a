//! Task HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::projects::{load_project, require_member};
use crate::backend::server::state::AppState;
use crate::shared::{CreateTaskRequest, Project, ServerEvent, Task, UpdateTaskRequest};

/// Load a task and the project it belongs to, checking membership
pub(crate) async fn load_task_for_member(
    state: &AppState,
    user: &AuthenticatedUser,
    task_id: Uuid,
) -> ApiResult<(Task, Project)> {
    let task = state
        .store
        .task_by_id(task_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Task not found"))?;
    let project = load_project(state, task.project).await?;
    require_member(&project, user)?;
    Ok((task, project))
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let project = load_project(&state, request.project).await?;
    require_member(&project, &user)?;

    let task = Task::new(user.user_id, request)?;
    state.store.insert_task(&task).await?;

    tracing::info!("[Tasks] {} created '{}' in {}", user.username, task.title, project.id);
    state
        .channel
        .broadcast(task.project, ServerEvent::TaskCreated(task.clone()));

    Ok((StatusCode::CREATED, Json(task)))
}

/// Tasks of one project, newest first
pub async fn list_project_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let project = load_project(&state, project_id).await?;
    require_member(&project, &user)?;

    let tasks = state.store.tasks_for_project(project_id).await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let (task, _) = load_task_for_member(&state, &user, task_id).await?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let (mut task, _) = load_task_for_member(&state, &user, task_id).await?;

    task.apply_update(request)?;
    state.store.update_task(&task).await?;

    tracing::info!("[Tasks] {} updated {} ({})", user.username, task.id, task.status.as_str());
    state
        .channel
        .broadcast(task.project, ServerEvent::TaskUpdated(task.clone()));

    Ok(Json(task))
}

/// Delete a task (its creator or the project owner)
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let (task, project) = load_task_for_member(&state, &user, task_id).await?;

    if task.created_by != user.user_id && !project.is_owner(user.user_id) {
        tracing::warn!("[Tasks] {} may not delete {}", user.username, task.id);
        return Err(BackendError::forbidden(
            "Only the task creator or the project owner can delete this task",
        ));
    }

    state.store.delete_task(task.id).await?;

    tracing::info!("[Tasks] {} deleted {}", user.username, task.id);
    state
        .channel
        .broadcast(task.project, ServerEvent::TaskDeleted(task.id));

    Ok(Json(json!({ "message": "Task removed" })))
}
