//! Tasks Module
//!
//! HTTP handlers for `/api/tasks`. Every route checks that the caller is a
//! member of the task's project. Each successful mutation emits exactly one
//! event into the project room:
//!
//! | route                              | event          |
//! |------------------------------------|----------------|
//! | `POST /api/tasks`                  | `task-created` |
//! | `PUT /api/tasks/{id}`              | `task-updated` |
//! | `POST /api/tasks/{id}/attachments` | `task-updated` |
//! | `DELETE /api/tasks/{id}`           | `task-deleted` |
//!
//! Deleting a task is limited to its creator and the project owner.

pub mod attachments;
pub mod handlers;

pub use attachments::upload_attachment;
pub use handlers::*;
