//! Upload pipeline types.

use serde::Serialize;

/// What a successful upload returns to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Public playback page for the stored file.
    pub audio_url: String,
    /// `audio_url` as a PNG QR code data URI.
    pub qr_code: String,
}
