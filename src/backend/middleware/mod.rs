//! Middleware Module
//!
//! This module contains HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer token authentication for `/api` routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use taskcollab::backend::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/api/projects", get(list_projects))
//!     .layer(from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, authenticate, AuthUser, AuthenticatedUser};
