//! Real-time Project Channel
//!
//! This module pushes task lifecycle events to every client viewing a
//! project, and relays typing presence between them.
//!
//! # Architecture
//!
//! - **`channel`** - `EventChannel`, the room table with per-connection queues
//! - **`socket`** - WebSocket upgrade, connection loop and message dispatch
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs     - Module exports and documentation
//! ├── channel.rs - Rooms, join/leave, broadcast, disconnect
//! └── socket.rs  - GET /socket transport
//! ```
//!
//! # Rooms
//!
//! A room is keyed by project ID. It exists while at least one connection is
//! joined and is dropped when the last one leaves or disconnects. Joining is
//! only honoured for project members.
//!
//! # Event Flow
//!
//! ```text
//! PUT /api/tasks/{id} ──> store ──> EventChannel::broadcast(project, task-updated)
//!                                        │
//!                      ┌─────────────────┼─────────────────┐
//!                      ▼                 ▼                 ▼
//!                   conn-1            conn-2            conn-3   (joined to the project)
//! ```
//!
//! Typing presence goes through `broadcast_except_sender` so the typist never
//! sees their own indicator.
//!
//! # Scaling
//!
//! The room table lives in process memory. Running several server instances
//! would need an external relay between them.

/// Room table and fan-out
pub mod channel;

/// WebSocket transport
pub mod socket;

pub use channel::{ConnectionId, EventChannel};
pub use socket::{handle_client_event, handle_socket_upgrade, DispatchOutcome};
