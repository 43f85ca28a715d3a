//! Client Module
//!
//! Library side of the platform for programs that consume the API: an HTTP
//! client, a locally reconciled task board, and a session that keeps the
//! board in step with a project room.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs     - Module exports and documentation
//! ├── error.rs   - ClientError
//! ├── api.rs     - ApiClient (reqwest)
//! ├── board.rs   - TaskBoard reconciliation and typing presence
//! └── session.rs - ProjectSession and the TaskSource trait
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use taskcollab::client::{ApiClient, ProjectSession};
//! use taskcollab::shared::{AppConfig, LoginRequest};
//!
//! # async fn example(project_id: uuid::Uuid) -> Result<(), taskcollab::client::ClientError> {
//! let mut api = ApiClient::new(AppConfig::from_env()?);
//! api.login(&LoginRequest {
//!     email: "alice@example.com".into(),
//!     password: "hunter22".into(),
//! })
//! .await?;
//!
//! let (outbound, _socket_queue) = tokio::sync::mpsc::unbounded_channel();
//! let mut session = ProjectSession::new(project_id, api, outbound);
//! session.on_connected().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The WebSocket transport itself is left to the embedding program: it
//! drains the outbound queue into the socket at `AppConfig::socket_url()`
//! and feeds inbound text frames to `ProjectSession::handle_frame`.

pub mod error;

pub mod api;

pub mod board;

pub mod session;

pub use api::ApiClient;
pub use board::{BoardChange, BoardColumns, TaskBoard, DEFAULT_TYPING_TTL};
pub use error::ClientError;
pub use session::{ProjectSession, TaskSource};
