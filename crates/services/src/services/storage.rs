use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid scope: {0}")]
    InvalidScope(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reference to a stored file, relative to the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct StoredObject {
    pub path: String,
}

/// Local-disk file storage. Uploads land under `<root>/<scope>/<uuid>.<ext>`
/// and are served statically; `public_url` derives the URL clients embed in
/// records.
#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
    public_base: String,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    /// Store `bytes` under a randomized name scoped to `scope` (for example
    /// `projects`). The original file name only contributes its extension;
    /// when it has none, the extension is guessed from the content type.
    pub async fn upload(
        &self,
        scope: &str,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredObject, StorageError> {
        if scope.is_empty()
            || !scope
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StorageError::InvalidScope(scope.to_string()));
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
            .or_else(|| {
                content_type
                    .and_then(|ct| mime_guess::get_mime_extensions_str(ct))
                    .and_then(|exts| exts.first())
                    .map(|e| e.to_string())
            })
            .unwrap_or_else(|| "bin".to_string());

        let rel = format!("{scope}/{}.{ext}", Uuid::new_v4());
        let dest = self.root.join(&rel);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, bytes).await?;

        debug!(path = %rel, size = bytes.len(), "stored upload");
        Ok(StoredObject { path: rel })
    }

    pub fn public_url(&self, object: &StoredObject) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), object.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &tempfile::TempDir) -> StorageService {
        StorageService::new(dir.path(), "/assets")
    }

    #[tokio::test]
    async fn upload_writes_file_and_derives_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(&dir);

        let object = storage
            .upload("projects", "still.PNG", None, b"png-bytes")
            .await
            .unwrap();

        assert!(object.path.starts_with("projects/"));
        assert!(object.path.ends_with(".png"));
        let on_disk = tokio::fs::read(dir.path().join(&object.path)).await.unwrap();
        assert_eq!(on_disk, b"png-bytes");
        assert_eq!(
            storage.public_url(&object),
            format!("/assets/{}", object.path)
        );
    }

    #[tokio::test]
    async fn extension_falls_back_to_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(&dir);

        let object = storage
            .upload("clients", "logo", Some("image/png"), b"x")
            .await
            .unwrap();
        assert!(object.path.ends_with(".png"));
    }

    #[tokio::test]
    async fn traversal_scopes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = service(&dir);

        for scope in ["../etc", "a/b", ""] {
            let err = storage.upload(scope, "f.png", None, b"x").await;
            assert!(matches!(err, Err(StorageError::InvalidScope(_))), "{scope}");
        }
    }
}
