//! Listing of previously uploaded files for the admin page.

use std::sync::Arc;

use serde::Serialize;

use crate::storage::{BlobStore, StorageError, StoredAudioObject};

/// One row of the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedFile {
    /// Position in the listing, 1-based and zero-padded (`01`, `02`, ...).
    pub id: String,
    /// Display filename.
    pub filename: String,
    /// Where the file can be downloaded.
    pub download_url: String,
    /// Provider identifier, only for providers that assign one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// Re-queries the blob store on every call; nothing is cached.
pub struct ListingService {
    store: Arc<dyn BlobStore>,
}

impl ListingService {
    /// Create a new listing service.
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// List stored files in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read; no partial results.
    pub async fn list_files(&self) -> Result<Vec<ListedFile>, StorageError> {
        let objects = self.store.list().await?;
        Ok(number_listing(objects))
    }
}

/// Zero-padded, 1-based listing id for the entry at `index`.
#[must_use]
pub fn listing_id(index: usize) -> String {
    format!("{:02}", index + 1)
}

fn number_listing(objects: Vec<StoredAudioObject>) -> Vec<ListedFile> {
    objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| ListedFile {
            id: listing_id(index),
            filename: object.filename,
            download_url: object.retrieval_url,
            public_id: object.public_id,
        })
        .collect()
}
