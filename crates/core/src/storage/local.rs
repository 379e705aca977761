//! Local filesystem blob store backed by OpenDAL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use opendal::{Operator, services};
use tracing::debug;
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::store::BlobStore;
use super::types::{AudioUpload, StoredAudioObject};

/// URL prefix the uploads directory is served under.
pub const FILES_ROUTE: &str = "/files";

/// Stores uploads as `{uuid}{.ext}` files in a single directory.
pub struct LocalBlobStore {
    operator: Operator,
    root: PathBuf,
    config: StorageConfig,
}

impl LocalBlobStore {
    /// Create the store, creating the root directory if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not `LocalFs` or the directory
    /// cannot be created.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let StorageProvider::LocalFs { root } = &config.provider else {
            return Err(StorageError::configuration("expected a local_fs provider"));
        };

        let root = std::path::absolute(root)
            .map_err(|e| StorageError::configuration(format!("invalid upload dir: {e}")))?;
        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::configuration(format!("cannot create {}: {e}", root.display()))
        })?;

        let builder = services::Fs::default().root(
            root.to_str()
                .ok_or_else(|| StorageError::configuration("invalid path"))?,
        );
        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();

        Ok(Self {
            operator,
            root,
            config,
        })
    }

    fn describe(&self, name: String) -> StoredAudioObject {
        StoredAudioObject {
            retrieval_url: self.retrieval_url(&name),
            filename: name.clone(),
            id: name,
            public_id: None,
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, upload: AudioUpload) -> Result<StoredAudioObject, StorageError> {
        self.config.validate_upload(&upload)?;

        let name = stored_name(Uuid::new_v4(), &upload.original_name);
        let size = upload.size();
        self.operator.write(&name, upload.bytes).await?;

        debug!(stored_id = %name, size, "Wrote upload to local storage");
        Ok(self.describe(name))
    }

    async fn list(&self) -> Result<Vec<StoredAudioObject>, StorageError> {
        let entries = self.operator.list("/").await?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.metadata().is_file())
            .map(|entry| entry.name().to_string())
            .filter(|name| !name.is_empty() && !name.starts_with('.'))
            .map(|name| self.describe(name))
            .collect())
    }

    fn retrieval_url(&self, id: &str) -> String {
        format!("{FILES_ROUTE}/{id}")
    }

    fn local_root(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

/// On-disk name for a new upload: the id plus the original extension.
///
/// The extension is reduced to ASCII alphanumerics so it can never carry a
/// path separator.
fn stored_name(id: Uuid, original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn store_in(dir: &Path) -> LocalBlobStore {
        LocalBlobStore::from_config(StorageConfig::new(StorageProvider::local_fs(dir)))
            .expect("should create store")
    }

    #[test]
    fn test_stored_name_keeps_extension() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").expect("valid uuid");
        assert_eq!(
            stored_name(id, "take 1.wav"),
            "550e8400-e29b-41d4-a716-446655440000.wav"
        );
        assert_eq!(
            stored_name(id, "voice.M4A"),
            "550e8400-e29b-41d4-a716-446655440000.M4A"
        );
        assert_eq!(stored_name(id, "README"), id.to_string());
        assert_eq!(stored_name(id, "clip.m-p3"), format!("{id}.mp3"));
    }

    #[test]
    fn test_creates_missing_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("nested").join("uploads");

        let store = store_in(&root);

        assert!(root.is_dir());
        assert_eq!(store.local_root(), Some(root.as_path()));
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        let stored = store
            .store(AudioUpload::new(
                "greeting.wav",
                Some("audio/wav".into()),
                Bytes::from_static(b"RIFF....WAVE"),
            ))
            .await
            .expect("store should succeed");

        assert!(stored.id.ends_with(".wav"));
        assert_eq!(stored.filename, stored.id);
        assert_eq!(stored.retrieval_url, format!("/files/{}", stored.id));
        assert_eq!(stored.public_id, None);

        let on_disk = std::fs::read(dir.path().join(&stored.id)).expect("file written");
        assert_eq!(on_disk, b"RIFF....WAVE");
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::from_config(
            StorageConfig::new(StorageProvider::local_fs(dir.path())).with_max_file_size(4),
        )
        .expect("should create store");

        let err = store
            .store(AudioUpload::new("big.wav", None, vec![0u8; 5]))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::FileTooLarge { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).expect("readable").count(), 0);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        assert!(store.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_dotfiles_and_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.mp3"), b"a").expect("write");
        std::fs::write(dir.path().join(".DS_Store"), b"x").expect("write");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");
        let store = store_in(dir.path());

        let listed = store.list().await.expect("list");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].filename, "a.mp3");
        assert_eq!(listed[0].retrieval_url, "/files/a.mp3");
    }

    #[tokio::test]
    async fn test_list_sees_stored_uploads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(dir.path());

        for name in ["one.wav", "two.mp3", "three.ogg"] {
            store
                .store(AudioUpload::new(name, None, Bytes::from_static(b"data")))
                .await
                .expect("store");
        }

        assert_eq!(store.list().await.expect("list").len(), 3);
    }
}
