//! The blob store contract and backend selection.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::cloudinary::CloudinaryStore;
use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::local::LocalBlobStore;
use super::types::{AudioUpload, StoredAudioObject};

/// Save bytes, get back an address.
///
/// Implementations own everything they persist; callers keep no index and
/// re-query [`BlobStore::list`] whenever they need the current contents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist an upload under a freshly generated identifier.
    async fn store(&self, upload: AudioUpload) -> Result<StoredAudioObject, StorageError>;

    /// Enumerate stored objects in backend order.
    async fn list(&self) -> Result<Vec<StoredAudioObject>, StorageError>;

    /// Where the object with stored identifier `id` can be fetched.
    fn retrieval_url(&self, id: &str) -> String;

    /// Directory the stored objects can be served from as static files.
    fn local_root(&self) -> Option<&Path> {
        None
    }

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}

/// Build the blob store selected by `config`.
///
/// # Errors
///
/// Returns an error if the backend cannot be initialized.
pub fn from_config(config: StorageConfig) -> Result<Arc<dyn BlobStore>, StorageError> {
    let store: Arc<dyn BlobStore> = match config.provider {
        StorageProvider::LocalFs { .. } => Arc::new(LocalBlobStore::from_config(config)?),
        StorageProvider::Cloudinary { .. } => Arc::new(CloudinaryStore::from_config(config)?),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = from_config(StorageConfig::new(StorageProvider::local_fs(dir.path())))
            .expect("local store");

        assert_eq!(store.provider_name(), "local");
        assert_eq!(store.local_root(), Some(dir.path()));
    }

    #[test]
    fn test_from_config_selects_cloudinary() {
        let store = from_config(StorageConfig::new(StorageProvider::cloudinary(
            "demo", "key", "secret", "audio-qr",
        )))
        .expect("cloudinary store");

        assert_eq!(store.provider_name(), "cloudinary");
        assert!(store.local_root().is_none());
    }
}
