//! Backend Module
//!
//! This module contains all server-side code for the task collaboration
//! platform: the REST API under `/api`, the real-time project channel on
//! `/socket`, and static serving of uploaded attachments.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Registration, login, profile, JWT tokens
//! - **`middleware`** - Bearer-token authentication
//! - **`projects`** - Project CRUD and membership
//! - **`tasks`** - Task CRUD and attachment upload
//! - **`realtime`** - Project rooms and the WebSocket transport
//! - **`store`** - Persistence (PostgreSQL or in-memory)
//! - **`attachments`** - Attachment file storage
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication handlers and tokens
//! ├── middleware/     - Request middleware
//! ├── projects/       - Project handlers and access checks
//! ├── tasks/          - Task handlers and uploads
//! ├── realtime/       - Event channel
//! ├── store/          - Store trait, PostgreSQL and memory backends
//! ├── attachments/    - Local attachment storage
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! request ──> TraceLayer ──> CorsLayer ──> auth_middleware ──> handler
//!                                                               │
//!                                       store write ◀───────────┤
//!                                  EventChannel::broadcast ◀────┘
//! ```
//!
//! # Error Handling
//!
//! Handlers return `ApiResult<T>`. Every `BackendError` renders as
//! `{"error": <message>, "status": <code>}` with the matching status.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time project channel
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Persistence layer
pub mod store;

/// Attachment file storage
pub mod attachments;

/// Project handlers
pub mod projects;

/// Task handlers
pub mod tasks;

pub use error::{ApiResult, BackendError};
pub use realtime::EventChannel;
pub use server::{create_app, AppState, ServerConfig};
pub use store::{MemoryStore, PgStore, Store, StoreError};
