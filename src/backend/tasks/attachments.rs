/**
 * Task Attachment Upload
 *
 * `POST /api/tasks/{id}/attachments` takes a multipart form with one file in
 * the `attachment` field, hands it to the configured `AttachmentStorage`
 * and appends the resulting `{url, storageId}` to the task.
 */
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use super::handlers::load_task_for_member;
use crate::backend::attachments::Upload;
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{ServerEvent, Task};

/// Multipart field carrying the file
pub const ATTACHMENT_FIELD: &str = "attachment";

async fn read_upload(multipart: &mut Multipart) -> ApiResult<Option<Upload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BackendError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(ATTACHMENT_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| BackendError::bad_request(format!("Failed to read upload: {}", e)))?;
        return Ok(Some(Upload {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

pub async fn upload_attachment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(task_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<Task>> {
    let (task, _) = load_task_for_member(&state, &user, task_id).await?;

    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| BackendError::bad_request("No file uploaded"))?;

    let stored = state.attachments.store(upload).await?;
    let task = state.store.push_attachment(task.id, stored.into()).await?;

    tracing::info!(
        "[Tasks] {} attached a file to {} ({} attachments)",
        user.username,
        task.id,
        task.attachments.len()
    );
    state
        .channel
        .broadcast(task.project, ServerEvent::TaskUpdated(task.clone()));

    Ok(Json(task))
}
