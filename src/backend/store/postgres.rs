/**
 * PostgreSQL Store
 *
 * sqlx implementation of [`Store`]. Schema lives in `migrations/`:
 *
 * - `users` with unique `username` and `email`
 * - `projects` plus a `project_members` join table (ordered by `added_at`)
 * - `tasks` with attachments kept as a JSONB array
 *
 * Deleting a project removes its memberships and tasks through
 * `ON DELETE CASCADE`.
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, User};
use crate::shared::{Attachment, Project, ProjectStatus, Task, TaskPriority, TaskStatus};

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, created_at, updated_at";

const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.title, p.description, p.status, p.due_date, p.owner,
           ARRAY(
               SELECT m.user_id FROM project_members m
               WHERE m.project_id = p.id
               ORDER BY m.added_at, m.user_id
           ) AS members,
           p.created_at, p.updated_at
    FROM projects p
"#;

const TASK_COLUMNS: &str = "id, title, description, project, assigned_to, created_by, priority, status, due_date, attachments, created_at, updated_at";

/// Store implementation backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    due_date: Option<DateTime<Utc>>,
    owner: Uuid,
    members: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            description: row.description,
            status: ProjectStatus::from_str(&row.status).unwrap_or_default(),
            due_date: row.due_date,
            owner: row.owner,
            members: row.members,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    description: String,
    project: Uuid,
    assigned_to: Option<Uuid>,
    created_by: Uuid,
    priority: String,
    status: String,
    due_date: Option<DateTime<Utc>>,
    attachments: Json<Vec<Attachment>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            project: row.project,
            assigned_to: row.assigned_to,
            created_by: row.created_by,
            priority: TaskPriority::from_str(&row.priority).unwrap_or_default(),
            status: TaskStatus::from_str(&row.status).unwrap_or_default(),
            due_date: row.due_date,
            attachments: row.attachments.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map constraint violations onto store errors
fn map_write_error(err: sqlx::Error, conflict: &str, missing: &'static str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::conflict(conflict);
        }
        if db.is_foreign_key_violation() {
            return StoreError::not_found(missing);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, avatar, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Username or email already registered", "User"))?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, avatar = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Username or email already in use", "User"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User"));
        }
        Ok(())
    }

    async fn insert_project(&self, project: &Project) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, title, description, status, due_date, owner, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(project.due_date)
        .bind(project.owner)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Project already exists", "User"))?;

        for member in &project.members {
            sqlx::query("INSERT INTO project_members (project_id, user_id) VALUES ($1, $2)")
                .bind(project.id)
                .bind(member)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, "Duplicate project member", "User"))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn project_by_id(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!("{PROJECT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Project::from))
    }

    async fn projects_for_member(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"{PROJECT_SELECT}
            WHERE EXISTS (
                SELECT 1 FROM project_members m
                WHERE m.project_id = p.id AND m.user_id = $1
            )
            ORDER BY p.created_at DESC"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn update_project(&self, project: &Project) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET title = $2, description = $3, status = $4, due_date = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(project.due_date)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Project"));
        }
        Ok(())
    }

    async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project> {
        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Duplicate project member", "Project"))?;

        sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        self.project_by_id(project_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Project"))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        let tasks = sqlx::query("DELETE FROM tasks WHERE project = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let projects = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if projects == 0 {
            tx.rollback().await?;
            return Err(StoreError::not_found("Project"));
        }

        tx.commit().await?;
        Ok(tasks)
    }

    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, project, assigned_to, created_by,
                               priority, status, due_date, attachments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.project)
        .bind(task.assigned_to)
        .bind(task.created_by)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(Json(&task.attachments))
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Task already exists", "Project"))?;
        Ok(())
    }

    async fn task_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Task::from))
    }

    async fn tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project = $1 ORDER BY created_at DESC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn update_task(&self, task: &Task) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, assigned_to = $4, priority = $5,
                status = $6, due_date = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.assigned_to)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Task conflict", "User"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Task"));
        }
        Ok(())
    }

    async fn push_attachment(&self, task_id: Uuid, attachment: Attachment) -> StoreResult<Task> {
        // Atomic append
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks
            SET attachments = attachments || jsonb_build_array($2::jsonb), updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(Json(&attachment))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::from).ok_or_else(|| StoreError::not_found("Task"))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Task"));
        }
        Ok(())
    }
}
