//! Core logic for audioqr.
//!
//! This crate contains the upload pipeline with ZERO web framework
//! dependencies. The HTTP layer only extracts requests and renders responses.
//!
//! # Modules
//!
//! - `storage` - Blob store trait with local filesystem and Cloudinary backends
//! - `qr` - QR code rendering to PNG data URIs
//! - `upload` - Store, derive the playback URL, encode it as a QR code
//! - `listing` - Numbered listing of stored files

pub mod listing;
pub mod qr;
pub mod storage;
pub mod upload;
