//! HTTP client for OpenAI-compatible image APIs

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{GenerateRequest, GenerateResponse, GeneratedImage, ImageBackend};
use crate::config::UpstreamConfig;
use crate::error::{AppError, Result};
use crate::payload::ImageAsset;

/// Image backend speaking the OpenAI images API
pub struct OpenAiBackend {
    name: String,
    client: Client,
    base_url: String,
    model: String,
}

/// JSON body for `/images/generations`
#[derive(Debug, Serialize)]
struct ApiGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ApiImagesResponse {
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    data: Vec<ApiImageData>,
}

#[derive(Debug, Deserialize)]
struct ApiImageData {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiBackend {
    /// Create a new backend from configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: "openai".to_string(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Multipart body for `/images/edits`
    fn edit_form(&self, request: GenerateRequest) -> Result<Form> {
        let mut form = Form::new()
            .text("model", self.model.clone())
            .text("prompt", request.prompt)
            .text("size", request.size)
            .text("quality", request.quality)
            .text("n", "1");

        // Several source images go up as an ordered `image[]` list
        let image_field = if request.images.len() > 1 {
            "image[]"
        } else {
            "image"
        };
        for asset in request.images {
            form = form.part(image_field, asset_part(asset)?);
        }

        if let Some(mask) = request.mask {
            form = form.part("mask", asset_part(mask)?);
        }

        Ok(form)
    }
}

fn asset_part(asset: ImageAsset) -> Result<Part> {
    let part = Part::bytes(asset.bytes)
        .file_name(asset.filename)
        .mime_str(asset.mime_type)?;
    Ok(part)
}

/// Turn a non-success upstream response into an `Upstream` error
async fn upstream_error(response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body,
    };

    AppError::Upstream {
        status: Some(status.as_u16()),
        message,
    }
}

#[async_trait]
impl ImageBackend for OpenAiBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let mode = request.mode;
        let api_key = request.api_key.clone();

        let builder = if mode.is_edit_class() {
            let url = self.endpoint("/images/edits");
            debug!(
                backend = %self.name,
                url = %url,
                mode = %mode,
                images = request.images.len(),
                mask = request.mask.is_some(),
                "Sending edit request"
            );
            self.client.post(url).multipart(self.edit_form(request)?)
        } else {
            let url = self.endpoint("/images/generations");
            debug!(backend = %self.name, url = %url, mode = %mode, "Sending generate request");
            self.client.post(url).json(&ApiGenerateRequest {
                model: &self.model,
                prompt: &request.prompt,
                size: &request.size,
                quality: &request.quality,
                n: 1,
            })
        };

        let response = builder.bearer_auth(api_key.expose()).send().await?;

        if !response.status().is_success() {
            let err = upstream_error(response).await;
            warn!(backend = %self.name, mode = %mode, error = %err, "Upstream call failed");
            return Err(err);
        }

        let api_response = response.json::<ApiImagesResponse>().await.map_err(|e| {
            AppError::Internal(format!("Failed to parse upstream response: {}", e))
        })?;

        let images = api_response
            .data
            .into_iter()
            .map(|img| GeneratedImage {
                b64_json: img.b64_json,
                url: img.url,
                revised_prompt: img.revised_prompt,
            })
            .collect();

        Ok(GenerateResponse {
            images,
            created: api_response.created,
        })
    }
}
