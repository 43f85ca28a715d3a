//! Client Error Types
//!
//! Errors raised by the HTTP client and the project session.
//!
//! # Error Categories
//!
//! - `Network` - the request never produced a response (connection refused, timeout)
//! - `Api` - the server answered with a non-success status
//! - `Decode` - a response or channel frame could not be parsed
//! - `NotAuthenticated` - an authenticated endpoint was called without a token
//! - `ChannelClosed` - the outbound socket queue has been dropped

use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Real-time channel closed")]
    ChannelClosed,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shared(#[from] SharedError),
}

impl ClientError {
    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
