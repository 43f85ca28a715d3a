/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 * Each variant maps onto one HTTP status code; the body is always
 * `{"error": <message>, "status": <code>}` (see `conversion.rs`).
 *
 * # Error Categories
 *
 * ## Request Errors
 *
 * - `BadRequest` (400) - validation failures, malformed input
 * - `Unauthorized` (401) - missing, malformed or expired token; bad credentials
 * - `Forbidden` (403) - authenticated but not allowed to touch the resource
 * - `NotFound` (404) - the addressed project, task or user does not exist
 *
 * ## Server Errors
 *
 * - `Unhandled` (500) - anything unexpected; the message is passed through
 * - `Store` - persistence errors, mapped by kind
 * - `SharedError` - domain validation errors from the shared module
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::attachments::StorageError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust,ignore
/// use taskcollab::backend::error::BackendError;
///
/// let err = BackendError::not_found("Project not found");
/// let err = BackendError::forbidden("Only the owner can delete a project");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// 400 Bad Request
    #[error("{message}")]
    BadRequest { message: String },

    /// 401 Unauthorized
    #[error("{message}")]
    Unauthorized { message: String },

    /// 403 Forbidden
    #[error("{message}")]
    Forbidden { message: String },

    /// 404 Not Found
    #[error("{message}")]
    NotFound { message: String },

    /// 500 Internal Server Error with the underlying message
    #[error("{message}")]
    Unhandled { message: String },

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Shared error (validation, illegal status move, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::Unhandled {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Store::NotFound` - 404
    /// - `Store::Conflict` - 400 (duplicate username or email)
    /// - `Store::Database` - 500
    /// - `SharedError::ValidationError` / `TransitionError` - 400
    /// - `SharedError::SerializationError` / `SerializationError` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(err) => match err {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Conflict { .. } => StatusCode::BAD_REQUEST,
                StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::TransitionError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message sent to the client
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Unhandled { message } => message.clone(),
            Self::Store(err) => err.to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing failed: {}", err);
        Self::unhandled(format!("Password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("Token signing failed: {}", err);
        Self::unhandled(format!("Token signing failed: {}", err))
    }
}

impl From<StorageError> for BackendError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Empty => Self::bad_request("No file uploaded"),
            StorageError::Io(_) => {
                tracing::error!("Attachment storage failed: {}", err);
                Self::unhandled(err.to_string())
            }
        }
    }
}
