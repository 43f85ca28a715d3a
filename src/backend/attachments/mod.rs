//! Attachment Storage Module
//!
//! Task attachments are handed to an [`AttachmentStorage`] implementation,
//! which persists the bytes and returns a public URL plus a storage
//! identifier. The task only records that pair; serving the file is the
//! storage backend's concern.
//!
//! # Module Structure
//!
//! ```text
//! attachments/
//! ├── mod.rs   - AttachmentStorage trait, Upload, StoredObject, StorageError
//! └── local.rs - Local filesystem backend served under /uploads
//! ```

pub mod local;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::shared::Attachment;

pub use local::LocalAttachmentStorage;

/// A file received from a multipart upload
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name as sent by the client
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Where a stored file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    pub storage_id: String,
}

impl From<StoredObject> for Attachment {
    fn from(object: StoredObject) -> Self {
        Attachment {
            url: object.url,
            storage_id: object.storage_id,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Attachment is empty")]
    Empty,

    #[error("Failed to write attachment: {0}")]
    Io(#[from] std::io::Error),
}

/// Backend that persists attachment bytes
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    async fn store(&self, upload: Upload) -> Result<StoredObject, StorageError>;
}
