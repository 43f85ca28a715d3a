/**
 * Real-time Route Configuration
 *
 * - `GET /socket` - WebSocket upgrade for the project channel. The token is
 *   checked inside the upgrade handler, since browsers cannot set headers on
 *   a WebSocket request and pass it as `?token=` instead.
 */

use axum::{routing::get, Router};

use crate::backend::realtime::handle_socket_upgrade;
use crate::backend::server::state::AppState;

pub fn configure_realtime_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/socket", get(handle_socket_upgrade))
}
