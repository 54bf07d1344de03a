use crate::error::{Error, Result};
use crate::models::EncodedImage;
use crate::presets::Preset;
use crate::providers::{negative_prompt, request_error, styled_prompt, TextToImage};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const API_URL: &str = "https://api.openai.com/v1/images/generations";

/// Client for the OpenAI image endpoint. No negative-prompt field exists, so
/// avoidances ride along as an `Avoid:` suffix.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    model_id: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, model_id: impl Into<String>) -> Self {
        Self {
            http,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl TextToImage for OpenAiClient {
    async fn generate(&self, prompt: &str, preset: &Preset, api_key: &str) -> Result<EncodedImage> {
        let full_prompt = format!(
            "{} Avoid: {}",
            styled_prompt(prompt, preset),
            negative_prompt(preset)
        );

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model_id,
                "prompt": full_prompt,
                "n": 1,
                "size": "1024x1024",
                "response_format": "b64_json"
            }))
            .send()
            .await
            .map_err(|e| request_error("OpenAI", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                provider: "OpenAI",
                status: status.as_u16(),
                body: extract_error_message(&body),
            });
        }

        let payload: ImagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Response(format!("invalid OpenAI response: {}", e)))?;

        let image = payload
            .data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .ok_or_else(|| Error::Response("no image data received from OpenAI".into()))?;

        Ok(EncodedImage::from_base64("image/png", image))
    }
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

/// Pull the human-readable message out of an OpenAI error envelope, keeping
/// the raw body when it isn't one.
fn extract_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_is_unwrapped() {
        let body = r#"{"error":{"message":"Billing hard limit reached","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Billing hard limit reached");
        assert_eq!(extract_error_message("plain failure"), "plain failure");
    }

    #[test]
    fn response_parsing_takes_the_first_image() {
        let payload: ImagesResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"QUJD"},{"b64_json":"REVG"}]}"#).unwrap();
        assert_eq!(
            payload.data.into_iter().next().unwrap().b64_json.as_deref(),
            Some("QUJD")
        );
    }
}
