/**
 * WebSocket Transport for the Project Channel
 *
 * `GET /socket` upgrades to a WebSocket after authenticating the bearer token
 * (from the `Authorization` header or the `token` query parameter). Each
 * connection then runs one task that:
 *
 * 1. drains its `EventChannel` queue into the socket
 * 2. parses incoming text frames as `ClientEvent`s and dispatches them
 * 3. removes itself from every room when the socket closes
 *
 * The channel has no error path back to the client: malformed frames,
 * refused joins and relays for rooms the connection has not joined are
 * logged and dropped.
 */
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::backend::auth::sessions::bearer_token;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::{authenticate, AuthenticatedUser};
use crate::backend::realtime::channel::ConnectionId;
use crate::backend::server::state::AppState;
use crate::shared::event::{TaskDeletedRelay, TaskRelay, TypingRequest};
use crate::shared::{ClientEvent, ServerEvent, TypingIndicator};

#[derive(Debug, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
}

/// What the server did with one client message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Connection joined the project room
    Joined,
    /// Join refused: unknown project or caller is not a member
    Refused,
    /// Connection left the project room
    Left,
    /// Event forwarded to this many connections
    Relayed(usize),
    /// Dropped: connection is not in the room or the payload is inconsistent
    Ignored,
}

/// Upgrade handler for `GET /socket`
pub async fn handle_socket_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SocketQuery>,
    headers: HeaderMap,
) -> Result<Response, BackendError> {
    let header_token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    let token = header_token
        .or(query.token)
        .ok_or_else(|| BackendError::unauthorized("Missing token"))?;

    let user = authenticate(&state, &token).await?;
    tracing::info!("[Realtime] Socket upgrade for {}", user.username);

    Ok(ws.on_upgrade(move |socket| run_connection(socket, state, user)))
}

async fn run_connection(socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let (conn, mut outbound) = state.channel.connect(user.user_id);
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            Some(event) = outbound.recv() => {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("[Realtime] Failed to encode {}: {}", event.name(), e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ClientEvent>(text.as_str()) {
                        Ok(event) => {
                            let outcome = handle_client_event(&state, conn, &user, event).await;
                            tracing::debug!("[Realtime] {} -> {:?}", conn, outcome);
                        }
                        Err(e) => tracing::debug!("[Realtime] {} sent malformed frame: {}", conn, e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("[Realtime] {} socket error: {}", conn, e);
                    break;
                }
            }
        }
    }

    let rooms = state.channel.disconnect(conn);
    tracing::info!(
        "[Realtime] {} closed for {} (left {} rooms)",
        conn,
        user.username,
        rooms
    );
}

/// Apply one client message to the room table
///
/// Transport-independent so tests can drive the channel without sockets.
pub async fn handle_client_event(
    state: &AppState,
    conn: ConnectionId,
    user: &AuthenticatedUser,
    event: ClientEvent,
) -> DispatchOutcome {
    match event {
        ClientEvent::JoinProject(project_id) => join_project(state, conn, user, project_id).await,
        ClientEvent::LeaveProject(project_id) => {
            state.channel.leave(project_id, conn);
            DispatchOutcome::Left
        }
        ClientEvent::TaskCreated(TaskRelay { project_id, task }) => {
            if task.project != project_id || !state.channel.is_member(project_id, conn) {
                return DispatchOutcome::Ignored;
            }
            DispatchOutcome::Relayed(state.channel.broadcast(project_id, ServerEvent::TaskCreated(task)))
        }
        ClientEvent::TaskUpdated(TaskRelay { project_id, task }) => {
            if task.project != project_id || !state.channel.is_member(project_id, conn) {
                return DispatchOutcome::Ignored;
            }
            DispatchOutcome::Relayed(state.channel.broadcast(project_id, ServerEvent::TaskUpdated(task)))
        }
        ClientEvent::TaskDeleted(TaskDeletedRelay { project_id, task_id }) => {
            if !state.channel.is_member(project_id, conn) {
                return DispatchOutcome::Ignored;
            }
            DispatchOutcome::Relayed(state.channel.broadcast(project_id, ServerEvent::TaskDeleted(task_id)))
        }
        ClientEvent::Typing(TypingRequest { project_id, task_id }) => {
            if !state.channel.is_member(project_id, conn) {
                return DispatchOutcome::Ignored;
            }
            let indicator = TypingIndicator {
                username: user.username.clone(),
                task_id,
            };
            DispatchOutcome::Relayed(state.channel.broadcast_except_sender(
                project_id,
                conn,
                ServerEvent::UserTyping(indicator),
            ))
        }
    }
}

async fn join_project(
    state: &AppState,
    conn: ConnectionId,
    user: &AuthenticatedUser,
    project_id: uuid::Uuid,
) -> DispatchOutcome {
    let project = match state.store.project_by_id(project_id).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            tracing::warn!("[Realtime] {} tried to join unknown project {}", user.username, project_id);
            return DispatchOutcome::Refused;
        }
        Err(e) => {
            tracing::error!("[Realtime] Failed to load project {}: {}", project_id, e);
            return DispatchOutcome::Refused;
        }
    };

    if !project.is_member(user.user_id) {
        tracing::warn!("[Realtime] {} is not a member of {}", user.username, project_id);
        return DispatchOutcome::Refused;
    }

    state.channel.join(project_id, conn);
    tracing::info!(
        "[Realtime] {} joined {} ({} connected)",
        user.username,
        project_id,
        state.channel.room_size(project_id)
    );
    DispatchOutcome::Joined
}
