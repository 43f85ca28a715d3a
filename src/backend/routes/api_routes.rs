/**
 * API Route Configuration
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 *
 * ## Authenticated (bearer token)
 * - `GET|PUT /api/auth/profile` - Own profile
 * - `GET|POST /api/projects`, `GET|PUT|DELETE /api/projects/{id}`
 * - `POST /api/projects/{id}/members`
 * - `POST /api/tasks`, `GET /api/tasks/project/{project_id}`
 * - `GET|PUT|DELETE /api/tasks/{id}`
 * - `POST /api/tasks/{id}/attachments`
 */

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_profile, login, register, update_profile};
use crate::backend::middleware::auth_middleware;
use crate::backend::projects::{
    add_member, create_project, delete_project, get_project, list_projects, update_project,
};
use crate::backend::server::state::AppState;
use crate::backend::tasks::{
    create_task, delete_task, get_task, list_project_tasks, update_task, upload_attachment,
};

/// Largest accepted attachment upload
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn configure_api_routes(router: Router<AppState>, app_state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/profile", get(get_profile).put(update_profile))
        // Projects
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/{id}/members", post(add_member))
        // Tasks
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/project/{project_id}", get(list_project_tasks))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/api/tasks/{id}/attachments",
            post(upload_attachment).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route_layer(from_fn_with_state(app_state, auth_middleware));

    router.merge(public).merge(protected)
}
