//! Request pipeline: validate, classify, size, decode, call upstream, normalize

use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::backend::traits::{ApiKey, GenerateRequest, ImageBackend};
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::payload::{self, ImageAsset};
use crate::request::ImageRequest;
use crate::response::{self, GenerationResult};

/// Runs image requests against one upstream backend. Holds no per-request state.
#[derive(Clone)]
pub struct ImageGateway {
    backend: Arc<dyn ImageBackend>,
    generation: GenerationConfig,
}

impl ImageGateway {
    pub fn new(backend: Arc<dyn ImageBackend>, generation: GenerationConfig) -> Self {
        Self {
            backend,
            generation,
        }
    }

    /// Handle one request end to end. The upstream is called at most once.
    pub async fn handle(&self, request: ImageRequest) -> Result<GenerationResult> {
        // Fail fast before any upstream cost
        let mode = request.validate()?;
        let size = self.generation.sizes.resolve(request.size_tier, mode);

        let span = tracing::info_span!(
            "image_request",
            request_id = %Uuid::new_v4(),
            mode = %mode,
            size = %size,
        );

        async move {
            let quality = request
                .quality_tier
                .clone()
                .unwrap_or_else(|| self.generation.default_quality(mode).to_string());

            let ImageRequest {
                prompt,
                api_key,
                source_images,
                mask,
                ..
            } = request;

            let images = if mode.is_edit_class() {
                payload::decode_images(source_images).await?
            } else {
                Vec::new()
            };
            let mask = match (mode.is_edit_class(), mask) {
                (true, Some(mask)) => Some(ImageAsset::decode_mask(&mask)?),
                _ => None,
            };

            info!(
                backend = %self.backend.name(),
                images = images.len(),
                quality = %quality,
                "Calling upstream image service"
            );

            let upstream = self
                .backend
                .generate(GenerateRequest {
                    mode,
                    prompt: prompt.clone(),
                    size: size.to_string(),
                    quality,
                    images,
                    mask,
                    api_key: ApiKey::new(api_key),
                })
                .await?;

            let result = response::normalize(upstream, size, &prompt, mode)?;
            info!(
                inline = result.image_data_uri.is_some(),
                url = result.image_url.is_some(),
                "Image request completed"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }
}
