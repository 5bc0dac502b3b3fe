//! Payload codec - turns base64 image and mask text into binary assets

pub mod base64;

use futures::future::try_join_all;
use std::fmt;
use tracing::debug;

use crate::error::{AppError, Result};

/// Mime type every asset is sent upstream with
pub const PNG_MIME: &str = "image/png";

/// A decoded image or mask ready to be sent to the upstream service
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

impl ImageAsset {
    /// Decode one base64 string (optionally a data URI) reported as `field` on failure
    pub fn decode(encoded: &str, field: &str, filename: impl Into<String>) -> Result<Self> {
        let bytes = base64::decode(encoded).map_err(|e| AppError::invalid_field(field, e))?;
        if bytes.is_empty() {
            return Err(AppError::invalid_field(field, "decoded image is empty"));
        }

        debug!(
            field = %field,
            source_format = base64::split_data_uri(encoded.trim()).0.unwrap_or("raw"),
            size = bytes.len(),
            "Decoded image asset"
        );

        Ok(Self {
            bytes,
            mime_type: PNG_MIME,
            filename: filename.into(),
        })
    }

    /// Decode a mask
    pub fn decode_mask(encoded: &str) -> Result<Self> {
        Self::decode(encoded, "mask", "mask.png")
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("size", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("filename", &self.filename)
            .finish()
    }
}

/// Field name and upload filename for the source image at `index`
fn image_names(index: usize, total: usize) -> (String, String) {
    let field = format!("images[{}]", index);
    if total == 1 {
        (field, "image.png".to_string())
    } else {
        (field, format!("image_{}.png", index))
    }
}

/// Decode every source image in parallel and return them in the original order
pub async fn decode_images(images: Vec<String>) -> Result<Vec<ImageAsset>> {
    let total = images.len();

    let decodes = images.into_iter().enumerate().map(|(index, encoded)| async move {
        let (field, filename) = image_names(index, total);
        match tokio::task::spawn_blocking(move || ImageAsset::decode(&encoded, &field, filename))
            .await
        {
            Ok(result) => result,
            Err(e) => Err(AppError::Internal(format!("Image decode task failed: {}", e))),
        }
    });

    try_join_all(decodes).await
}
