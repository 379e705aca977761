//! QR code rendering to PNG data URIs.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

/// Prefix of every data URI the encoder produces.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// QR encoding errors.
#[derive(Debug, Error)]
pub enum QrError {
    /// The payload does not fit in a QR symbol.
    #[error("cannot encode QR payload: {0}")]
    Payload(#[from] qrcode::types::QrError),

    /// PNG encoding failed.
    #[error("cannot encode QR image: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders text as a scannable QR code image.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    ec_level: EcLevel,
    module_size: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            module_size: 4,
        }
    }
}

impl QrEncoder {
    /// Set the pixel size of one QR module.
    #[must_use]
    pub fn with_module_size(mut self, pixels: u32) -> Self {
        self.module_size = pixels.max(1);
        self
    }

    /// Encode `text` as a `data:image/png;base64,...` URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is too long for a QR code or the PNG
    /// cannot be written.
    pub fn to_data_uri(&self, text: &str) -> Result<String, QrError> {
        let png = self.to_png(text)?;
        Ok(format!("{PNG_DATA_URI_PREFIX}{}", BASE64.encode(png)))
    }

    /// Encode `text` as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is too long for a QR code or the PNG
    /// cannot be written.
    pub fn to_png(&self, text: &str) -> Result<Vec<u8>, QrError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level)?;
        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

/// Decode a data URI produced by [`QrEncoder`] back to its text.
#[cfg(test)]
pub(crate) fn decode_data_uri(data_uri: &str) -> String {
    let encoded = data_uri
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .expect("png data uri");
    let png = BASE64.decode(encoded).expect("valid base64");
    let image = image::load_from_memory(&png).expect("valid png").to_luma8();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (_meta, content) = grids[0].decode().expect("decodable QR code");
    content
}
