//! TaskCollab - Main Library
//!
//! A multi-user task and project collaboration platform: users register,
//! create projects, invite members and manage tasks, with live updates pushed
//! to everyone viewing a project.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and backend
//!   - Projects, tasks, user profiles, request bodies
//!   - Real-time event vocabulary
//!   - Error and client configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum REST API with JWT authentication
//!   - Project rooms over WebSocket
//!   - PostgreSQL or in-memory persistence
//!
//! - **`client`** - Library for API consumers
//!   - `ApiClient` over reqwest
//!   - `TaskBoard` reconciliation
//!   - `ProjectSession` with resync on reconnect
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend module and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use taskcollab::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// API client and board reconciliation
pub mod client;
