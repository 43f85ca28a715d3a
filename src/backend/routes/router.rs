/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API banner (`GET /`)
 * 2. Real-time routes (`GET /socket`)
 * 3. API routes (`/api/...`)
 * 4. Stored attachments (`/uploads`)
 * 5. Fallback handler (JSON 404)
 *
 * # Layers
 *
 * - `CorsLayer` allowing `CLIENT_URL` (or any origin when unset)
 * - `TraceLayer` for per-request spans
 */

use axum::{
    http::{HeaderValue, Uri},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::realtime_routes::configure_realtime_routes;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;

pub const API_BANNER: &str = "Task Collaboration Platform API";

async fn banner() -> Json<Value> {
    Json(json!({ "message": API_BANNER }))
}

async fn not_found(uri: Uri) -> BackendError {
    BackendError::not_found(format!("Not Found - {}", uri))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match config.client_url.as_deref() {
        Some(url) => match url.parse::<HeaderValue>() {
            Ok(origin) => base.allow_origin(origin),
            Err(e) => {
                tracing::warn!("Ignoring invalid CLIENT_URL {}: {}", url, e);
                base.allow_origin(Any)
            }
        },
        None => base.allow_origin(Any),
    }
}

pub fn create_router(app_state: AppState, config: &ServerConfig) -> Router<()> {
    let router = Router::new().route("/", get(banner));

    let router = configure_realtime_routes(router);

    let router = configure_api_routes(router, app_state.clone());

    let router = router.nest_service("/uploads", ServeDir::new(&config.upload_dir));

    let router = router.fallback(not_found);

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(app_state)
}
