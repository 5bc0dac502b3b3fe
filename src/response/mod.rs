//! Response normalization - one uniform result whatever the upstream returned

use serde::Serialize;

use crate::backend::traits::GenerateResponse;
use crate::error::{AppError, Result};
use crate::payload::base64::png_data_url;
use crate::request::Mode;

/// Uniform success payload of the image endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub image_url: Option<String>,
    /// `data:image/png;base64,...` URI of the inline image
    #[serde(rename = "imageData")]
    pub image_data_uri: Option<String>,
    #[serde(rename = "selectedSize")]
    pub resolved_size: String,
    pub original_prompt: String,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

/// Build the result from the first upstream image.
///
/// Inline data and URL are carried independently; an upstream that returns
/// neither breaks its contract and yields `AppError::Internal`.
pub fn normalize(
    response: GenerateResponse,
    resolved_size: &str,
    prompt: &str,
    mode: Mode,
) -> Result<GenerationResult> {
    let first = response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("Upstream returned no images".to_string()))?;

    let image_data_uri = first
        .b64_json
        .filter(|data| !data.is_empty())
        .map(|data| png_data_url(&data));
    let image_url = first.url.filter(|url| !url.is_empty());

    if image_data_uri.is_none() && image_url.is_none() {
        return Err(AppError::Internal(
            "Upstream returned neither image data nor an image URL".to_string(),
        ));
    }

    Ok(GenerationResult {
        success: true,
        image_url,
        image_data_uri,
        resolved_size: resolved_size.to_string(),
        original_prompt: prompt.to_string(),
        mode,
        revised_prompt: first.revised_prompt,
    })
}
