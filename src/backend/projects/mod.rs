//! Projects Module
//!
//! HTTP handlers for `/api/projects`. Reads require membership; updates,
//! deletion and invitations are reserved for the owner.
//!
//! # Routes
//!
//! - `POST /api/projects` - create; the caller becomes owner and first member
//! - `GET /api/projects` - projects the caller belongs to, newest first
//! - `GET /api/projects/{id}` - read (members)
//! - `PUT /api/projects/{id}` - update (owner)
//! - `DELETE /api/projects/{id}` - delete together with its tasks (owner)
//! - `POST /api/projects/{id}/members` - add a member (owner)

pub mod access;
pub mod handlers;

pub use access::{load_project, require_member, require_owner};
pub use handlers::*;
