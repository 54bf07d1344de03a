use crate::error::{Error, Result};
use crate::models::EncodedImage;
use crate::presets::Preset;
use crate::providers::{negative_prompt, request_error, styled_prompt, TextToImage};
use async_trait::async_trait;
use reqwest::multipart::Form;

const API_URL: &str = "https://api.stability.ai/v2beta/stable-image/generate/sd3";

/// Client for the Stability SD3 endpoint. Takes prompt and negative prompt as
/// separate form fields and answers with the raw image bytes.
#[derive(Clone)]
pub struct StabilityClient {
    http: reqwest::Client,
}

impl StabilityClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TextToImage for StabilityClient {
    async fn generate(&self, prompt: &str, preset: &Preset, api_key: &str) -> Result<EncodedImage> {
        let form = Form::new()
            .text("prompt", styled_prompt(prompt, preset))
            .text("negative_prompt", negative_prompt(preset))
            .text("output_format", "webp")
            .text("mode", "text-to-image")
            // Standardized output resolution.
            .text("aspect_ratio", "1:1");

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "image/*")
            .multipart(form)
            .send()
            .await
            .map_err(|e| request_error("Stability AI", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                provider: "Stability AI",
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Response(format!("failed to read Stability AI image: {}", e)))?;

        Ok(EncodedImage::from_bytes("image/webp", &bytes))
    }
}
