/**
 * Local Filesystem Attachment Storage
 *
 * Files are written to `<root>/task-attachments/<uuid>.<ext>` and exposed at
 * `<public_base>/uploads/task-attachments/<uuid>.<ext>` by the `ServeDir`
 * mounted in the router. The storage ID is the path relative to `root`.
 */
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use super::{AttachmentStorage, StorageError, StoredObject, Upload};

const FOLDER: &str = "task-attachments";

#[derive(Debug, Clone)]
pub struct LocalAttachmentStorage {
    root: PathBuf,
    public_base: String,
}

impl LocalAttachmentStorage {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Lowercased alphanumeric extension of the original file name, if any
fn extension(file_name: Option<&str>) -> Option<String> {
    let ext = Path::new(file_name?).extension()?.to_str()?;
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

#[async_trait]
impl AttachmentStorage for LocalAttachmentStorage {
    async fn store(&self, upload: Upload) -> Result<StoredObject, StorageError> {
        if upload.bytes.is_empty() {
            return Err(StorageError::Empty);
        }

        let file_name = match extension(upload.file_name.as_deref()) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let storage_id = format!("{}/{}", FOLDER, file_name);

        let dir = self.root.join(FOLDER);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &upload.bytes).await?;

        tracing::debug!(
            "Stored attachment {} ({} bytes, {:?})",
            storage_id,
            upload.bytes.len(),
            upload.content_type
        );

        Ok(StoredObject {
            url: format!("{}/uploads/{}", self.public_base, storage_id),
            storage_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_extension_is_sanitized() {
        assert_eq!(extension(Some("report.PDF")), Some("pdf".to_string()));
        assert_eq!(extension(Some("../../etc/passwd")), None);
        assert_eq!(extension(Some("evil.p/hp")), None);
        assert_eq!(extension(None), None);
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path(), "http://localhost:5000/");

        let stored = storage
            .store(Upload {
                file_name: Some("screenshot.png".to_string()),
                content_type: Some("image/png".to_string()),
                bytes: Bytes::from_static(b"png-bytes"),
            })
            .await
            .unwrap();

        assert!(stored.storage_id.starts_with("task-attachments/"));
        assert!(stored.storage_id.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("http://localhost:5000/uploads/{}", stored.storage_id)
        );

        let written = tokio::fs::read(dir.path().join(&stored.storage_id)).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn test_store_rejects_empty_upload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalAttachmentStorage::new(dir.path(), "http://localhost");
        let result = storage
            .store(Upload {
                file_name: None,
                content_type: None,
                bytes: Bytes::new(),
            })
            .await;
        assert!(matches!(result, Err(StorageError::Empty)));
    }
}
