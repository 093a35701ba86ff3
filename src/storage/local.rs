use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{object_key, BlobError, BlobStore};
use crate::models::sound::{AudioUpload, SoundKind};

/// URL prefix under which the router serves the storage directory.
pub const CDN_PREFIX: &str = "/cdn/";

/// Blob store writing into a local directory that is served under `/cdn`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the per-kind directories up front.
    pub async fn prepare(&self) -> std::io::Result<()> {
        for kind in [SoundKind::Background, SoundKind::Session] {
            tokio::fs::create_dir_all(self.root.join(kind.directory())).await?;
        }
        Ok(())
    }

    fn path_for_url(&self, url: &str) -> Result<PathBuf, BlobError> {
        let rel = url
            .strip_prefix(CDN_PREFIX)
            .filter(|rel| !rel.is_empty() && !rel.split('/').any(|seg| seg == ".."))
            .ok_or_else(|| BlobError::MalformedUrl(url.to_string()))?;
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(
        &self,
        kind: SoundKind,
        key: &str,
        audio: &AudioUpload,
    ) -> Result<String, BlobError> {
        let dir = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BlobError::Backend(format!("failed to create {} directory: {e}", kind.directory()))
        })?;

        let full_key = object_key(kind, key);
        tokio::fs::write(self.root.join(&full_key), &audio.bytes)
            .await
            .map_err(|e| BlobError::Backend(format!("failed to write sound file: {e}")))?;

        tracing::debug!("stored {} bytes at {full_key}", audio.bytes.len());
        Ok(format!("{CDN_PREFIX}{full_key}"))
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let path = self.path_for_url(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("blob {url} already gone");
                Ok(())
            }
            Err(e) => Err(BlobError::Backend(format!("failed to delete file: {e}"))),
        }
    }
}

/// Unique scratch directory for tests.
pub fn temp_storage_path() -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("soundserver-test-{}", uuid::Uuid::new_v4()));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> AudioUpload {
        AudioUpload {
            filename: "rain.mp3".to_string(),
            content_type: Some("audio/mpeg".to_string()),
            bytes: b"ID3 fake mp3".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_writes_under_kind_directory() {
        let store = LocalBlobStore::new(temp_storage_path());
        let url = store
            .upload(SoundKind::Background, "abc-rain.mp3", &audio())
            .await
            .unwrap();
        assert_eq!(url, "/cdn/background-audios/abc-rain.mp3");

        let written = std::fs::read(store.root().join("background-audios/abc-rain.mp3")).unwrap();
        assert_eq!(written, b"ID3 fake mp3");
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let store = LocalBlobStore::new(temp_storage_path());
        let url = store
            .upload(SoundKind::Session, "abc-focus.mp3", &audio())
            .await
            .unwrap();
        store.delete(&url).await.unwrap();
        assert!(!store.root().join("session-audios/abc-focus.mp3").exists());
        // second delete of the same blob is a no-op
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_urls() {
        let store = LocalBlobStore::new(temp_storage_path());
        for url in [
            "https://bucket.s3.us-east-1.amazonaws.com/background-audios/x.mp3",
            "/cdn/",
            "/cdn/../secrets",
        ] {
            assert!(matches!(
                store.delete(url).await.unwrap_err(),
                BlobError::MalformedUrl(_)
            ));
        }
    }
}
