//! Store Module
//!
//! Persistence for users, projects and tasks behind a single async trait.
//! Handlers only ever talk to `dyn Store`, so the same routes run against
//! PostgreSQL in production and against the in-memory store in tests or
//! when no `DATABASE_URL` is configured.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - Store trait, StoreError, User record
//! ├── memory.rs   - In-memory implementation (tokio RwLock)
//! └── postgres.rs - sqlx/PostgreSQL implementation
//! ```
//!
//! # Consistency
//!
//! Each call is atomic on its own. Nothing serializes a read-modify-write
//! sequence across calls, so two concurrent updates to the same task are
//! last-write-wins.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::{Attachment, Project, Task, UserProfile};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A uniqueness constraint was violated
    #[error("{message}")]
    Conflict { message: String },

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt hash, never sent to clients
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public view without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Persistence operations used by the API layer
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user; fails with `Conflict` when the email or username is taken
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    /// Overwrite a user's mutable fields
    async fn update_user(&self, user: &User) -> StoreResult<()>;

    /// Insert a project together with its member list
    async fn insert_project(&self, project: &Project) -> StoreResult<()>;
    async fn project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>>;
    /// Projects the user belongs to, newest first
    async fn projects_for_member(&self, user_id: Uuid) -> StoreResult<Vec<Project>>;
    /// Overwrite a project's scalar fields (not its members)
    async fn update_project(&self, project: &Project) -> StoreResult<()>;
    /// Append a member; returns the project as stored afterwards
    async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project>;
    /// Delete a project and every task in it; returns the number of tasks removed
    async fn delete_project(&self, id: Uuid) -> StoreResult<u64>;

    async fn insert_task(&self, task: &Task) -> StoreResult<()>;
    async fn task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;
    /// Tasks of a project, newest first
    async fn tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;
    /// Overwrite a task's mutable fields (not its attachments)
    async fn update_task(&self, task: &Task) -> StoreResult<()>;
    /// Append an attachment; returns the task as stored afterwards
    async fn push_attachment(&self, task_id: Uuid, attachment: Attachment) -> StoreResult<Task>;
    async fn delete_task(&self, id: Uuid) -> StoreResult<()>;
}
