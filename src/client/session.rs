/**
 * Project Session
 *
 * Drives a `TaskBoard` for one project over a real-time connection.
 *
 * # Lifecycle
 *
 * ```text
 * on_connected ──> send join-project ──> resync (full re-fetch) ──> handle_frame ...
 *      ▲                                                                  │
 *      └──────────────── on_disconnected (socket dropped) ◀──────────────┘
 * ```
 *
 * Every (re)connect sends `join-project` first and then re-fetches the task
 * list, so events emitted while the session was away are recovered.
 * Frames buffered during the fetch are applied afterwards; reconciliation is
 * idempotent so overlap with the fetched list is harmless.
 *
 * Local changes go through the REST API only. The server emits the matching
 * event to the whole room, the originator included, and the session applies
 * it like any other frame.
 *
 * The session does not own a socket. Outbound `ClientEvent`s are pushed into
 * an `mpsc` queue that the transport drains; inbound text frames are handed
 * to `handle_frame`.
 */
use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::client::api::ApiClient;
use crate::client::board::{BoardChange, TaskBoard};
use crate::client::error::ClientError;
use crate::shared::event::TypingRequest;
use crate::shared::{ClientEvent, ServerEvent, Task};

/// Where a session re-fetches its task list from
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ClientError>;
}

#[async_trait]
impl TaskSource for ApiClient {
    async fn fetch_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ClientError> {
        self.list_tasks(project_id).await
    }
}

pub struct ProjectSession<S: TaskSource> {
    source: S,
    board: TaskBoard,
    outbound: mpsc::UnboundedSender<ClientEvent>,
    connected: bool,
    resyncs: u64,
}

impl<S: TaskSource> ProjectSession<S> {
    pub fn new(project_id: Uuid, source: S, outbound: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self::with_board(TaskBoard::new(project_id), source, outbound)
    }

    pub fn with_board(board: TaskBoard, source: S, outbound: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self {
            source,
            board,
            outbound,
            connected: false,
            resyncs: 0,
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.board.project_id()
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Number of completed full re-fetches
    pub fn resync_count(&self) -> u64 {
        self.resyncs
    }

    fn send(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.outbound.send(event).map_err(|_| ClientError::ChannelClosed)
    }

    /// Socket (re)established: join the room, then resync
    pub async fn on_connected(&mut self) -> Result<(), ClientError> {
        self.send(ClientEvent::JoinProject(self.project_id()))?;
        self.connected = true;
        tracing::debug!("[Session] Joined {}, resyncing", self.project_id());
        self.resync().await
    }

    /// Socket lost; typing indicators from the old connection are dropped
    pub fn on_disconnected(&mut self) {
        self.connected = false;
        self.board.clear_typing();
        tracing::debug!("[Session] Disconnected from {}", self.project_id());
    }

    /// Replace the board with a fresh listing from the source
    pub async fn resync(&mut self) -> Result<(), ClientError> {
        let tasks = self.source.fetch_tasks(self.project_id()).await?;
        tracing::debug!("[Session] Resynced {} tasks for {}", tasks.len(), self.project_id());
        self.board.replace_all(tasks);
        self.resyncs += 1;
        Ok(())
    }

    pub fn handle_event(&mut self, event: ServerEvent) -> BoardChange {
        self.board.apply(event)
    }

    /// Parse and apply one inbound text frame
    pub fn handle_frame(&mut self, frame: &str) -> Result<BoardChange, ClientError> {
        let event: ServerEvent = serde_json::from_str(frame)?;
        Ok(self.handle_event(event))
    }

    /// Announce that the user is typing, optionally on a specific task
    pub fn send_typing(&self, task_id: Option<Uuid>) -> Result<(), ClientError> {
        self.send(ClientEvent::Typing(TypingRequest {
            project_id: self.project_id(),
            task_id,
        }))
    }

    /// Leave the room; the session stays usable for a later `on_connected`
    pub fn leave(&mut self) -> Result<(), ClientError> {
        self.connected = false;
        self.send(ClientEvent::LeaveProject(self.project_id()))
    }
}
