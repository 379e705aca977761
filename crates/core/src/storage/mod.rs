//! Blob storage for uploaded audio.
//!
//! Two interchangeable backends sit behind the [`BlobStore`] trait:
//! - Local filesystem, through Apache OpenDAL
//! - Cloudinary, through its REST API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Arc<dyn BlobStore>                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ store(upload) -> StoredAudioObject  │ list() -> [StoredAudioObject]│
//! │ retrieval_url(id)                   │ local_root()                 │
//! ├────────────────────────────┬────────────────────────────────────┤
//! │ LocalBlobStore (OpenDAL fs)│ CloudinaryStore (upload + search)   │
//! └────────────────────────────┴────────────────────────────────────┘
//! ```

mod cloudinary;
mod config;
mod error;
mod local;
mod store;
mod types;

pub use cloudinary::{CloudinaryStore, MAX_LIST_RESULTS};
pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use local::{FILES_ROUTE, LocalBlobStore};
pub use store::{BlobStore, from_config};
pub use types::{AudioUpload, StoredAudioObject};
