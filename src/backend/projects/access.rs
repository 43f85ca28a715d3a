/**
 * Project Access Checks
 *
 * Helpers shared by project and task handlers. A missing project is a 404;
 * an existing project the caller may not touch is a 403.
 */
use uuid::Uuid;

use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::server::state::AppState;
use crate::shared::Project;

pub async fn load_project(state: &AppState, project_id: Uuid) -> ApiResult<Project> {
    state
        .store
        .project_by_id(project_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Project not found"))
}

pub fn require_member(project: &Project, user: &AuthenticatedUser) -> ApiResult<()> {
    if project.is_member(user.user_id) {
        Ok(())
    } else {
        tracing::warn!("[Projects] {} is not a member of {}", user.username, project.id);
        Err(BackendError::forbidden("Not a member of this project"))
    }
}

pub fn require_owner(project: &Project, user: &AuthenticatedUser) -> ApiResult<()> {
    if project.is_owner(user.user_id) {
        Ok(())
    } else {
        tracing::warn!("[Projects] {} is not the owner of {}", user.username, project.id);
        Err(BackendError::forbidden("Only the project owner can do this"))
    }
}
