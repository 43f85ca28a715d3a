//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use taskcollab::backend::error::BackendError;
//!
//! async fn handler() -> Result<Json<Project>, BackendError> {
//!     Err(BackendError::not_found("Project not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias used by handlers
pub type ApiResult<T> = Result<T, BackendError>;
