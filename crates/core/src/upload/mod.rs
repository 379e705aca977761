//! Upload pipeline: store the file, derive its playback URL, render a QR.
//!
//! This module provides:
//! - The `UploadService` orchestrating one upload
//! - Playback URL derivation
//! - The upload error taxonomy and its HTTP mapping

mod error;
mod service;
mod types;

pub use error::UploadError;
pub use service::{UploadService, playback_url};
pub use types::UploadResult;
