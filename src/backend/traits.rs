//! Common traits and types for the upstream image service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::payload::ImageAsset;
use crate::request::Mode;

/// Caller-supplied credential, forwarded to the upstream and never printed
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

/// Request to the upstream image service
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub mode: Mode,

    pub prompt: String,

    /// Concrete `WxH` size
    pub size: String,

    pub quality: String,

    /// Source images in caller order; empty in generate mode
    pub images: Vec<ImageAsset>,

    /// Inpaint mask
    pub mask: Option<ImageAsset>,

    pub api_key: ApiKey,
}

/// One generated image as returned by the upstream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Base64 encoded image data
    pub b64_json: Option<String>,

    /// URL to the image
    pub url: Option<String>,

    /// Revised prompt if the model modified it
    pub revised_prompt: Option<String>,
}

/// Response from the upstream image service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub images: Vec<GeneratedImage>,

    /// Unix timestamp reported by the upstream
    pub created: Option<i64>,
}

/// Trait for upstream image generation services
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Run one generate, edit or inpaint call. Called at most once per request.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}
