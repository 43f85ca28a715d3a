/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, store selection, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Pick the store (PostgreSQL when reachable, in-memory otherwise)
 * 2. Prepare attachment storage under `UPLOAD_DIR`
 * 3. Derive the token keys from `JWT_SECRET`
 * 4. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::attachments::LocalAttachmentStorage;
use crate::backend::auth::sessions::TokenKeys;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// Startup never fails here: a missing or unreachable database falls back
/// to the in-memory store, and a missing upload directory is created on the
/// first upload.
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing task collaboration server");

    // Step 1: Store
    let store = load_store(config).await;

    // Step 2: Attachments
    let attachments = Arc::new(LocalAttachmentStorage::new(
        config.upload_dir.clone(),
        config.public_url.clone(),
    ));
    tracing::info!("Attachments stored under {}", config.upload_dir.display());

    // Step 3: Token keys
    let tokens = TokenKeys::from_secret(config.jwt_secret.as_bytes());

    // Step 4: Router
    let app_state = AppState::new(store, attachments, tokens);
    create_router(app_state, config)
}
