//! Objects passed to and returned from blob stores.

use bytes::Bytes;
use serde::Serialize;

/// A file received from a client, held in memory until stored.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Content type as sent by the client.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Bytes,
}

impl AudioUpload {
    /// Create an upload.
    #[must_use]
    pub fn new(
        original_name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// An object persisted by a blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAudioObject {
    /// Stored identifier, used in the playback URL.
    pub id: String,
    /// Display filename.
    pub filename: String,
    /// Where the object can be fetched from.
    pub retrieval_url: String,
    /// Provider-assigned identifier, when the provider has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}
