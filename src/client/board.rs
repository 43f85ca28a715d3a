/**
 * Task Board State
 *
 * Local copy of one project's tasks, kept in step with the server by
 * applying `ServerEvent`s from the project room.
 *
 * # Reconciliation Rules
 *
 * | event          | effect                                               |
 * |----------------|------------------------------------------------------|
 * | `task-created` | append unless a task with that id is already present |
 * | `task-updated` | replace by id; unknown ids are ignored               |
 * | `task-deleted` | remove by id; absent ids are a no-op                 |
 * | `user-typing`  | record a typing indicator, tasks untouched           |
 *
 * Every rule is idempotent, so the echo of a client's own change and a
 * duplicate delivery after a resync leave the board unchanged.
 *
 * Events carrying a task from a different project are ignored.
 */
use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::client::error::ClientError;
use crate::shared::{ServerEvent, SharedError, Task, TaskStatus, TypingIndicator, UpdateTaskRequest};

/// How long a typing indicator stays visible without a refresh
pub const DEFAULT_TYPING_TTL: Duration = Duration::from_secs(3);

/// What applying one event did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardChange {
    Added(Uuid),
    Replaced(Uuid),
    Removed(Uuid),
    Typing,
    Unchanged,
}

#[derive(Debug, Clone)]
struct TypingEntry {
    task_id: Option<Uuid>,
    seen_at: Instant,
}

/// Tasks grouped into board columns
#[derive(Debug, Default)]
pub struct BoardColumns<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> BoardColumns<'a> {
    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskBoard {
    project_id: Uuid,
    tasks: Vec<Task>,
    typing: HashMap<String, TypingEntry>,
    typing_ttl: Duration,
}

impl TaskBoard {
    pub fn new(project_id: Uuid) -> Self {
        Self::with_typing_ttl(project_id, DEFAULT_TYPING_TTL)
    }

    pub fn with_typing_ttl(project_id: Uuid, typing_ttl: Duration) -> Self {
        Self {
            project_id,
            tasks: Vec::new(),
            typing: HashMap::new(),
            typing_ttl,
        }
    }

    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole task list with a fresh server listing
    ///
    /// Tasks from other projects and duplicate ids are dropped.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let project_id = self.project_id;
        self.tasks.clear();
        for task in tasks.into_iter().filter(|task| task.project == project_id) {
            if !self.contains(task.id) {
                self.tasks.push(task);
            }
        }
    }

    /// Apply one event from the project room
    pub fn apply(&mut self, event: ServerEvent) -> BoardChange {
        self.apply_at(event, Instant::now())
    }

    /// Apply one event, stamping typing indicators with `now`
    pub fn apply_at(&mut self, event: ServerEvent, now: Instant) -> BoardChange {
        match event {
            ServerEvent::TaskCreated(task) => {
                if task.project != self.project_id || self.contains(task.id) {
                    return BoardChange::Unchanged;
                }
                let id = task.id;
                self.tasks.push(task);
                BoardChange::Added(id)
            }
            ServerEvent::TaskUpdated(task) => {
                if task.project != self.project_id {
                    return BoardChange::Unchanged;
                }
                match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
                    Some(existing) => {
                        let id = task.id;
                        *existing = task;
                        BoardChange::Replaced(id)
                    }
                    None => BoardChange::Unchanged,
                }
            }
            ServerEvent::TaskDeleted(id) => {
                let before = self.tasks.len();
                self.tasks.retain(|task| task.id != id);
                if self.tasks.len() < before {
                    BoardChange::Removed(id)
                } else {
                    BoardChange::Unchanged
                }
            }
            ServerEvent::UserTyping(TypingIndicator { username, task_id }) => {
                self.typing.insert(username, TypingEntry { task_id, seen_at: now });
                BoardChange::Typing
            }
        }
    }

    /// Drop typing indicators older than the TTL; returns how many were removed
    pub fn prune_typing(&mut self, now: Instant) -> usize {
        let ttl = self.typing_ttl;
        let before = self.typing.len();
        self.typing
            .retain(|_, entry| now.saturating_duration_since(entry.seen_at) < ttl);
        before - self.typing.len()
    }

    /// Typing indicators still live at `now`, sorted by username
    pub fn active_typists(&self, now: Instant) -> Vec<TypingIndicator> {
        let mut active: Vec<TypingIndicator> = self
            .typing
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.seen_at) < self.typing_ttl)
            .map(|(username, entry)| TypingIndicator {
                username: username.clone(),
                task_id: entry.task_id,
            })
            .collect();
        active.sort_by(|a, b| a.username.cmp(&b.username));
        active
    }

    pub fn clear_typing(&mut self) {
        self.typing.clear();
    }

    /// Group tasks by status, keeping list order inside each column
    pub fn columns(&self) -> BoardColumns<'_> {
        let mut columns = BoardColumns::default();
        for task in &self.tasks {
            match task.status {
                TaskStatus::Todo => columns.todo.push(task),
                TaskStatus::InProgress => columns.in_progress.push(task),
                TaskStatus::Completed => columns.completed.push(task),
            }
        }
        columns
    }

    /// Build the update that moves a card one column forward
    ///
    /// The board itself is not changed; it follows once the server emits
    /// `task-updated`.
    pub fn advance_request(&self, id: Uuid) -> Result<UpdateTaskRequest, ClientError> {
        let task = self.get(id).ok_or_else(|| ClientError::Api {
            status: 404,
            message: "Task not found".to_string(),
        })?;
        let next = task.status.next().ok_or_else(|| {
            SharedError::transition(format!("{} is a final status", task.status.as_str()))
        })?;
        Ok(UpdateTaskRequest::status(next))
    }
}
