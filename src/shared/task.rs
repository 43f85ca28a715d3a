/**
 * Task Data Structure
 *
 * Tasks belong to exactly one project and are the unit that the real-time
 * channel carries around: every `task-created` and `task-updated` event
 * holds a full `Task`, so clients can replace their local copy wholesale.
 *
 * # Status Flow
 *
 * The board moves cards strictly forward, one step at a time:
 *
 * ```text
 * todo -> in-progress -> completed
 * ```
 *
 * The API does not enforce this; a direct update may set any status.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::patch::{self, double_option};

/// Priority of a task
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Board column a task sits in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All statuses in board order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// The next column on the board, if any
    pub fn next(&self) -> Option<TaskStatus> {
        match self {
            TaskStatus::Todo => Some(TaskStatus::InProgress),
            TaskStatus::InProgress => Some(TaskStatus::Completed),
            TaskStatus::Completed => None,
        }
    }

    /// Check a board move: only a single step forward is allowed
    pub fn advance_to(&self, target: TaskStatus) -> Result<TaskStatus, SharedError> {
        match self.next() {
            Some(next) if next == target => Ok(next),
            Some(next) => Err(SharedError::transition(format!(
                "{} can only move to {}, not {}",
                self.as_str(),
                next.as_str(),
                target.as_str()
            ))),
            None => Err(SharedError::transition(format!(
                "{} is a final status",
                self.as_str()
            ))),
        }
    }
}

/// A file attached to a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Public URL of the stored file
    pub url: String,
    /// Identifier assigned by the attachment storage backend
    pub storage_id: String,
}

/// A unit of work inside a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Owning project
    pub project: Uuid,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a new task created by `created_by`
    pub fn new(created_by: Uuid, request: CreateTaskRequest) -> Result<Self, SharedError> {
        let title = validate_title(request.title)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: request.description.unwrap_or_default(),
            project: request.project,
            assigned_to: request.assigned_to,
            created_by,
            priority: request.priority.unwrap_or_default(),
            status: TaskStatus::Todo,
            due_date: request.due_date,
            attachments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an update request, leaving absent fields untouched
    pub fn apply_update(&mut self, update: UpdateTaskRequest) -> Result<(), SharedError> {
        if let Some(title) = update.title {
            self.title = validate_title(title)?;
        }
        if let Some(description) = update.description {
            self.description = description.unwrap_or_default();
        }
        patch::apply(&mut self.status, update.status);
        patch::apply(&mut self.priority, update.priority);
        patch::apply_nullable(&mut self.assigned_to, update.assigned_to);
        patch::apply_nullable(&mut self.due_date, update.due_date);
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_title(title: String) -> Result<String, SharedError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(SharedError::validation("title", "Title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Body of `POST /api/tasks`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub project: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/tasks/{id}`
///
/// `assignedTo: null` unassigns the task and `dueDate: null` clears the date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// Update that only moves the task to another column
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_bug(project: Uuid, creator: Uuid) -> Task {
        Task::new(
            creator,
            CreateTaskRequest {
                title: "Fix bug".to_string(),
                project,
                description: Some("Crash on save".to_string()),
                assigned_to: None,
                priority: None,
                due_date: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_task_defaults() {
        let task = fix_bug(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.attachments.is_empty());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
        assert_eq!(TaskStatus::from_str("in-progress"), Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_forward_single_step_only() {
        assert_eq!(TaskStatus::Todo.advance_to(TaskStatus::InProgress), Ok(TaskStatus::InProgress));
        assert_eq!(
            TaskStatus::InProgress.advance_to(TaskStatus::Completed),
            Ok(TaskStatus::Completed)
        );
        assert!(TaskStatus::Todo.advance_to(TaskStatus::Completed).is_err());
        assert!(TaskStatus::InProgress.advance_to(TaskStatus::Todo).is_err());
        assert!(TaskStatus::Completed.advance_to(TaskStatus::Todo).is_err());
        assert_eq!(TaskStatus::Completed.next(), None);
    }

    #[test]
    fn test_update_explicit_presence() {
        let mut task = fix_bug(Uuid::new_v4(), Uuid::new_v4());
        task.assigned_to = Some(Uuid::new_v4());

        let update: UpdateTaskRequest =
            serde_json::from_str(r#"{"description": "", "assignedTo": null}"#).unwrap();
        task.apply_update(update).unwrap();

        assert_eq!(task.description, "");
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.title, "Fix bug");
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let mut task = fix_bug(Uuid::new_v4(), Uuid::new_v4());
        let update = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(task.apply_update(update).is_err());
        assert_eq!(task.title, "Fix bug");
    }

    #[test]
    fn test_task_json_is_camel_case() {
        let task = fix_bug(Uuid::new_v4(), Uuid::new_v4());
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("createdBy").is_some());
        assert!(value.get("assignedTo").is_some());
        assert_eq!(value["status"], "todo");
    }
}
