//! Inbound image request model, mode classification and size policy

pub mod mode;
pub mod size;

pub use mode::Mode;
pub use size::{SizePolicy, SizeTable, SizeTier};

use serde::Deserialize;
use std::fmt;

use crate::error::{AppError, Result};

/// JSON body accepted by the image endpoints. Not `Debug`: it carries the credential.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequestBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub size: SizeTier,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Single-image field used by the inpaint endpoint
    #[serde(default)]
    pub image: Option<String>,
    /// Single-image field used by the analyze endpoint
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(default)]
    pub mode: Option<Mode>,
}

/// Normalized image request. Request-scoped; owns everything it needs.
#[derive(Clone, Default)]
pub struct ImageRequest {
    pub prompt: String,
    pub api_key: String,
    pub size_tier: SizeTier,
    pub quality_tier: Option<String>,
    pub source_images: Vec<String>,
    pub mask: Option<String>,
    pub requested_mode: Option<Mode>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ImageRequestBody> for ImageRequest {
    fn from(body: ImageRequestBody) -> Self {
        let mut source_images: Vec<String> = body
            .images
            .unwrap_or_default()
            .into_iter()
            .filter(|image| !image.trim().is_empty())
            .collect();
        source_images.extend(non_empty(body.image));
        source_images.extend(non_empty(body.image_base64));

        Self {
            prompt: body.prompt.unwrap_or_default(),
            api_key: body.api_key.unwrap_or_default(),
            size_tier: body.size,
            quality_tier: non_empty(body.quality),
            source_images,
            mask: non_empty(body.mask),
            requested_mode: body.mode,
        }
    }
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.source_images = images;
        self
    }

    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_size(mut self, size_tier: SizeTier) -> Self {
        self.size_tier = size_tier;
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality_tier = Some(quality.into());
        self
    }

    pub fn with_requested_mode(mut self, mode: Mode) -> Self {
        self.requested_mode = Some(mode);
        self
    }

    /// Mode implied by the assets on this request
    pub fn classify(&self) -> Mode {
        Mode::classify(!self.source_images.is_empty(), self.mask.is_some())
    }

    /// Check required fields and resolve the mode.
    ///
    /// All missing fields are reported together in one `Validation` error.
    pub fn validate(&self) -> Result<Mode> {
        let mut missing = Vec::new();
        if self.prompt.trim().is_empty() {
            missing.push("prompt");
        }
        if self.api_key.trim().is_empty() {
            missing.push("apiKey");
        }
        if let Some(requested) = self.requested_mode {
            missing.extend(
                requested.missing_assets(!self.source_images.is_empty(), self.mask.is_some()),
            );
        }

        if !missing.is_empty() {
            return Err(AppError::missing_fields(&missing));
        }

        Ok(self.classify())
    }
}

impl fmt::Debug for ImageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRequest")
            .field("prompt", &self.prompt)
            .field("api_key", &"[redacted]")
            .field("size_tier", &self.size_tier)
            .field("quality_tier", &self.quality_tier)
            .field("source_images", &self.source_images.len())
            .field("mask", &self.mask.is_some())
            .field("requested_mode", &self.requested_mode)
            .finish()
    }
}
