//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports and documentation
//! ├── router.rs          - Main router creation, CORS, tracing, fallback
//! ├── api_routes.rs      - REST endpoints under /api
//! └── realtime_routes.rs - WebSocket channel
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use taskcollab::backend::routes::create_router;
//! use taskcollab::backend::server::{config::ServerConfig, state::AppState};
//!
//! let app_state = AppState::in_memory("secret");
//! let router = create_router(app_state, &ServerConfig::default());
//! ```

pub mod router;

pub mod api_routes;

pub mod realtime_routes;

pub use router::create_router;
