use crate::error::{Error, Result};
use crate::models::{ChatMessage, EncodedImage};
use crate::presets::Preset;
use crate::providers::{
    negative_prompt, Assistant, TextToImage, ARTISTIC_MODIFIERS,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const IMAGES_URL: &str = "https://ark.ap-southeast.bytepluses.com/api/v3/images/generations";
const CHAT_URL: &str = "https://ark.ap-southeast.bytepluses.com/api/v3/chat/completions";
const CHAT_MODEL: &str = "gpt-oss-120b-250805";
const CHAT_MAX_TOKENS: u32 = 65535;

/// Client for the BytePlus Ark aggregator: Seedream image generation plus the
/// chat-completion sub-endpoint behind the design assistant.
///
/// Ark rejects connections from some network contexts outright; those surface
/// as [`Error::NetworkBlocked`] so callers can explain the restriction
/// instead of showing a generic failure.
#[derive(Clone)]
pub struct ArkClient {
    http: reqwest::Client,
    model_id: String,
}

impl ArkClient {
    pub fn new(http: reqwest::Client, model_id: impl Into<String>) -> Self {
        Self {
            http,
            model_id: model_id.into(),
        }
    }

    fn transport_error(err: reqwest::Error) -> Error {
        if err.is_connect() {
            Error::NetworkBlocked(format!(
                "the BytePlus API refused the connection from this network context: {}",
                err
            ))
        } else {
            Error::Request(format!("BytePlus request failed: {}", err))
        }
    }

    /// Seedream answers with a hosted URL; pull the bytes down so the caller
    /// gets the same encoded-image shape as every other engine.
    async fn download(&self, url: &str) -> Result<EncodedImage> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                provider: "BytePlus",
                status: status.as_u16(),
                body: format!("image download failed for {}", url),
            });
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Response(format!("failed to read Seedream image: {}", e)))?;

        Ok(EncodedImage::from_bytes(&mime_type, &bytes))
    }
}

#[async_trait]
impl TextToImage for ArkClient {
    async fn generate(&self, prompt: &str, preset: &Preset, api_key: &str) -> Result<EncodedImage> {
        let final_prompt = format!(
            "{}, {}. {} Avoid: {}",
            preset.base_prompt,
            prompt,
            ARTISTIC_MODIFIERS,
            negative_prompt(preset)
        );

        let response = self
            .http
            .post(IMAGES_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model_id,
                "prompt": final_prompt,
                "sequential_image_generation": "disabled",
                "response_format": "url",
                "size": "2K",
                "stream": false,
                "watermark": true
            }))
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                provider: "BytePlus",
                status: status.as_u16(),
                body,
            });
        }

        let payload: ImagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Response(format!("invalid Seedream response: {}", e)))?;

        if let Some(error) = payload.error {
            return Err(Error::Api {
                provider: "BytePlus",
                status: status.as_u16(),
                body: error.message,
            });
        }

        let url = payload
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| Error::Response("invalid response format from BytePlus API".into()))?;

        self.download(&url).await
    }
}

#[async_trait]
impl Assistant for ArkClient {
    async fn chat(&self, messages: &[ChatMessage], api_key: &str) -> Result<String> {
        let response = self
            .http
            .post(CHAT_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "model": CHAT_MODEL,
                "max_completion_tokens": CHAT_MAX_TOKENS,
                "messages": messages,
                "reasoning_effort": "medium"
            }))
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                provider: "BytePlus",
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Response(format!("invalid assistant response: {}", e)))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .ok_or_else(|| Error::Response("invalid response format from assistant API".into()))
    }
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatContent>,
}

#[derive(Deserialize)]
struct ChatContent {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_response_parsing() {
        let payload: ImagesResponse =
            serde_json::from_str(r#"{"data":[{"url":"https://cdn.example/i.png"}]}"#).unwrap();
        assert!(payload.error.is_none());
        assert_eq!(
            payload.data.into_iter().find_map(|d| d.url).as_deref(),
            Some("https://cdn.example/i.png")
        );
    }

    #[test]
    fn embedded_error_payload_is_detected() {
        let payload: ImagesResponse =
            serde_json::from_str(r#"{"error":{"message":"model overloaded"}}"#).unwrap();
        assert_eq!(payload.error.unwrap().message, "model overloaded");
    }

    #[test]
    fn chat_response_parsing() {
        let payload: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"try a duotone"}}]}"#,
        )
        .unwrap();
        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .unwrap()
            .content;
        assert_eq!(content, "try a duotone");
    }
}
