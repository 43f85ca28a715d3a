/**
 * In-memory Store
 *
 * Keeps every record in `HashMap`s behind a single `tokio::sync::RwLock`.
 * Used when no database is configured and by the test suite. Contents are
 * lost on restart.
 */
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, User};
use crate::shared::{Attachment, Project, Task};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

/// Store implementation backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::conflict("Email already registered"));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::conflict("Username already taken"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.id != user.id && (u.email == user.email || u.username == user.username));
        if taken {
            return Err(StoreError::conflict("Username or email already in use"));
        }
        let slot = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| StoreError::not_found("User"))?;
        *slot = user.clone();
        Ok(())
    }

    async fn insert_project(&self, project: &Project) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .projects
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn projects_for_member(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| p.is_member(user_id))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update_project(&self, project: &Project) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StoreError::not_found("Project"))?;
        stored.title = project.title.clone();
        stored.description = project.description.clone();
        stored.status = project.status;
        stored.due_date = project.due_date;
        stored.updated_at = project.updated_at;
        Ok(())
    }

    async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let project = tables
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| StoreError::not_found("Project"))?;
        project.add_member(user_id);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.projects.remove(&id).is_none() {
            return Err(StoreError::not_found("Project"));
        }
        let before = tables.tasks.len();
        tables.tasks.retain(|_, task| task.project != id);
        Ok((before - tables.tasks.len()) as u64)
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&task.project) {
            return Err(StoreError::not_found("Project"));
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.project == project_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| StoreError::not_found("Task"))?;
        let attachments = std::mem::take(&mut stored.attachments);
        *stored = task.clone();
        stored.attachments = attachments;
        Ok(())
    }

    async fn push_attachment(&self, task_id: Uuid, attachment: Attachment) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| StoreError::not_found("Task"))?;
        task.attachments.push(attachment);
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Task"))
    }
}
