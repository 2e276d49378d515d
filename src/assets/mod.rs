//! Storage for uploaded posters and photos.
//!
//! The catalog only ever holds the opaque reference returned by an
//! [`AssetStore`]; what the reference points at is up to the backend.

pub mod local;

pub use local::LocalAssetStore;

use async_trait::async_trait;
use thiserror::Error;

/// Container for movie posters.
pub const MOVIE_CONTAINER: &str = "movies";

/// Container for actor photos.
pub const ACTOR_CONTAINER: &str = "actors";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to write asset: {0}")]
    WriteFailed(String),

    #[error("Failed to delete asset: {0}")]
    DeleteFailed(String),

    #[error("Invalid asset reference: {0}")]
    InvalidReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded file on its way to the asset store.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub content: Vec<u8>,
    /// Extension including the leading dot, e.g. `.png`.
    pub extension: String,
    pub content_type: String,
}

impl AssetUpload {
    /// Builds an upload from a client file name, falling back to a guess from
    /// the extension when the client sent no usable content type.
    #[must_use]
    pub fn from_file(content: Vec<u8>, file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let extension = file_name
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();

        let content_type = content_type
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_ext(extension.trim_start_matches('.'))
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        Self {
            content,
            extension,
            content_type,
        }
    }
}

/// Backend for asset content.
///
/// Replacing an asset is a `store` of the new content followed by a `delete`
/// of the old reference once the new one is committed, so a failed database
/// write never leaves the stored reference pointing at removed content.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores new content and returns its reference.
    async fn store(
        &self,
        content: &[u8],
        extension: &str,
        container: &str,
        content_type: &str,
    ) -> Result<String, AssetError>;

    /// Removes the content behind `reference`. Unknown references are not an
    /// error.
    async fn delete(&self, reference: &str, container: &str) -> Result<(), AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_keeps_explicit_content_type() {
        let upload = AssetUpload::from_file(vec![1], Some("poster.PNG"), Some("image/png"));
        assert_eq!(upload.extension, ".png");
        assert_eq!(upload.content_type, "image/png");
    }

    #[test]
    fn upload_guesses_missing_content_type() {
        let upload = AssetUpload::from_file(vec![1], Some("photo.jpg"), None);
        assert_eq!(upload.content_type, "image/jpeg");

        let upload =
            AssetUpload::from_file(vec![1], Some("photo.gif"), Some("application/octet-stream"));
        assert_eq!(upload.content_type, "image/gif");
    }

    #[test]
    fn upload_without_file_name_has_no_extension() {
        let upload = AssetUpload::from_file(vec![1], None, None);
        assert_eq!(upload.extension, "");
        assert_eq!(upload.content_type, "application/octet-stream");
    }
}
