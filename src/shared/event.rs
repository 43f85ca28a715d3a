/**
 * Real-time Event Vocabulary
 *
 * This module defines the messages exchanged over the project channel.
 * Every frame is a JSON envelope of the form:
 *
 * ```json
 * {"event": "task-updated", "data": { ... }}
 * ```
 *
 * `ClientEvent` covers what a client may send (room membership, relayed task
 * notifications, typing), `ServerEvent` covers what the server pushes into a
 * project room.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::task::Task;

/// Event pushed by the server to every connection in a project room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A task was created; receivers append it
    TaskCreated(Task),
    /// A task changed; receivers replace their copy by id
    TaskUpdated(Task),
    /// A task was removed; receivers drop it by id
    TaskDeleted(Uuid),
    /// Someone in the room is typing; never delivered back to the typist
    UserTyping(TypingIndicator),
}

impl ServerEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::TaskCreated(_) => "task-created",
            ServerEvent::TaskUpdated(_) => "task-updated",
            ServerEvent::TaskDeleted(_) => "task-deleted",
            ServerEvent::UserTyping(_) => "user-typing",
        }
    }
}

/// Typing presence payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingIndicator {
    pub username: String,
    #[serde(default)]
    pub task_id: Option<Uuid>,
}

/// Message sent by a client over the channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Start receiving events for a project
    JoinProject(Uuid),
    /// Stop receiving events for a project
    LeaveProject(Uuid),
    /// Relay a task the client created through the API
    TaskCreated(TaskRelay),
    /// Relay a task the client updated through the API
    TaskUpdated(TaskRelay),
    /// Relay a task the client deleted through the API
    TaskDeleted(TaskDeletedRelay),
    /// Typing presence; the server fills in the username from the session
    Typing(TypingRequest),
}

impl ClientEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinProject(_) => "join-project",
            ClientEvent::LeaveProject(_) => "leave-project",
            ClientEvent::TaskCreated(_) => "task-created",
            ClientEvent::TaskUpdated(_) => "task-updated",
            ClientEvent::TaskDeleted(_) => "task-deleted",
            ClientEvent::Typing(_) => "typing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRelay {
    pub project_id: Uuid,
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeletedRelay {
    pub project_id: Uuid,
    pub task_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    pub project_id: Uuid,
    #[serde(default)]
    pub task_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deleted_envelope() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ServerEvent::TaskDeleted(id)).unwrap();
        assert_eq!(json["event"], "task-deleted");
        assert_eq!(json["data"], id.to_string());
    }

    #[test]
    fn test_user_typing_envelope() {
        let event = ServerEvent::UserTyping(TypingIndicator {
            username: "alice".to_string(),
            task_id: None,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "user-typing");
        assert_eq!(json["data"]["username"], "alice");
        assert_eq!(event.name(), "user-typing");
    }

    #[test]
    fn test_parse_join_project() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"event":"join-project","data":"{}"}}"#, id);
        let event: ClientEvent = serde_json::from_str(&raw).unwrap();
        assert_eq!(event, ClientEvent::JoinProject(id));
    }

    #[test]
    fn test_typing_ignores_client_username() {
        let project_id = Uuid::new_v4();
        let raw = format!(
            r#"{{"event":"typing","data":{{"projectId":"{}","username":"mallory"}}}}"#,
            project_id
        );
        let event: ClientEvent = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            event,
            ClientEvent::Typing(TypingRequest {
                project_id,
                task_id: None
            })
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event":"drop-tables","data":null}"#);
        assert!(result.is_err());
    }
}
