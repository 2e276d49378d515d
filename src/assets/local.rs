use super::{AssetError, AssetStore};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// Keeps assets as files under `root`, one directory per container.
///
/// References have the form `{public_base_url}/{container}/{uuid}{ext}` and
/// are served back by the HTTP layer from the same directory.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStore {
    pub async fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, AssetError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn validate_segment(segment: &str) -> Result<(), AssetError> {
        if segment.is_empty()
            || segment.contains("..")
            || segment.contains('/')
            || segment.contains('\\')
        {
            return Err(AssetError::InvalidReference(segment.to_string()));
        }
        Ok(())
    }

    fn reference_for(&self, container: &str, file_name: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, container, file_name)
    }

    /// Maps a reference back to the file it names, if it belongs to this
    /// store and container.
    fn path_for(&self, reference: &str, container: &str) -> Result<Option<PathBuf>, AssetError> {
        let prefix = format!("{}/{}/", self.public_base_url, container);
        let Some(file_name) = reference.strip_prefix(&prefix) else {
            return Ok(None);
        };
        Self::validate_segment(file_name)?;
        Ok(Some(self.root.join(container).join(file_name)))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(
        &self,
        content: &[u8],
        extension: &str,
        container: &str,
        content_type: &str,
    ) -> Result<String, AssetError> {
        Self::validate_segment(container)?;
        if extension.contains('/') || extension.contains('\\') {
            return Err(AssetError::InvalidReference(extension.to_string()));
        }

        let dir = self.root.join(container);
        fs::create_dir_all(&dir).await?;

        let file_name = format!("{}{}", Uuid::new_v4(), extension);
        let path = dir.join(&file_name);

        fs::write(&path, content)
            .await
            .map_err(|e| AssetError::WriteFailed(format!("{}: {e}", path.display())))?;

        info!(
            path = %path.display(),
            bytes = content.len(),
            content_type,
            "Stored asset"
        );

        Ok(self.reference_for(container, &file_name))
    }

    async fn delete(&self, reference: &str, container: &str) -> Result<(), AssetError> {
        let Some(path) = self.path_for(reference, container)? else {
            debug!(reference, container, "Reference not owned by local store, nothing to delete");
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Deleted asset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AssetError::DeleteFailed(format!("{}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalAssetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(dir.path(), "/assets/").await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn store_writes_file_and_returns_reference() {
        let (_dir, store) = store().await;
        let reference = store
            .store(b"png-bytes", ".png", "movies", "image/png")
            .await
            .unwrap();

        assert!(reference.starts_with("/assets/movies/"));
        assert!(reference.ends_with(".png"));

        let path = store.path_for(&reference, "movies").unwrap().unwrap();
        assert_eq!(fs::read(path).await.unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn delete_removes_only_the_named_file() {
        let (_dir, store) = store().await;
        let old = store
            .store(b"old", ".jpg", "actors", "image/jpeg")
            .await
            .unwrap();
        let new = store
            .store(b"new", ".jpg", "actors", "image/jpeg")
            .await
            .unwrap();
        assert_ne!(old, new);

        let old_path = store.path_for(&old, "actors").unwrap().unwrap();
        store.delete(&old, "actors").await.unwrap();

        assert!(!old_path.exists());
        let new_path = store.path_for(&new, "actors").unwrap().unwrap();
        assert_eq!(fs::read(new_path).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn delete_ignores_missing_and_foreign_references() {
        let (_dir, store) = store().await;
        store
            .delete("/assets/movies/does-not-exist.png", "movies")
            .await
            .unwrap();
        store
            .delete("https://cdn.example.com/poster.png", "movies")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let (_dir, store) = store().await;
        assert!(store.delete("/assets/movies/../secret", "movies").await.is_err());
        assert!(store.store(b"x", ".png", "../up", "image/png").await.is_err());
    }
}
