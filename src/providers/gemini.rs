use crate::error::{Error, Result};
use crate::models::EncodedImage;
use crate::presets::Preset;
use crate::providers::{negative_prompt, request_error, Multimodal};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const ANALYSIS_INSTRUCTION: &str = "Analyze the visual style of this image for an AI image generator. Describe the rendering style, color palette, linework, and composition as reusable prompt language, not the subject itself. Respond with a single JSON object with exactly these keys: \"basePrompt\" (a comma-separated style clause), \"negativePrompt\" (a comma-separated list of qualities to avoid), \"aspectRatio\" (like \"1:1\").";

/// Client for the multimodal endpoint: text+image conditioned generation and
/// style analysis over `generateContent`.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    model_id: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, model_id: impl Into<String>) -> Self {
        Self {
            http,
            model_id: model_id.into(),
        }
    }

    async fn invoke(&self, body: serde_json::Value, api_key: &str) -> Result<GenerateResponse> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model_id);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error("Gemini", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                provider: "Gemini",
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| Error::Response(format!("invalid Gemini response: {}", e)))
    }
}

#[async_trait]
impl Multimodal for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        preset: &Preset,
        reference: Option<&EncodedImage>,
        api_key: &str,
    ) -> Result<EncodedImage> {
        // No separate negative-prompt field on this API; fold it in.
        let text = format!("{} Avoid: {}", prompt, negative_prompt(preset));

        let mut parts = vec![json!({ "text": text })];
        if let Some(image) = reference {
            parts.push(json!({
                "inlineData": { "mimeType": image.mime_type, "data": image.data }
            }));
        }

        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": preset.aspect_ratio }
            }
        });

        let response = self.invoke(body, api_key).await?;
        response
            .first_image()
            .ok_or_else(|| Error::Response("no image data in Gemini response".into()))
    }

    async fn analyze_style(&self, image: &EncodedImage, api_key: &str) -> Result<Preset> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": ANALYSIS_INSTRUCTION },
                    { "inlineData": { "mimeType": image.mime_type, "data": image.data } }
                ]
            }],
            "generationConfig": { "responseModalities": ["TEXT"] }
        });

        let response = self.invoke(body, api_key).await?;
        let text = response
            .first_text()
            .ok_or_else(|| Error::Response("no text in Gemini analysis response".into()))?;

        let style: AnalyzedStyle = serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| Error::Response(format!("unparseable style analysis: {}", e)))?;

        // The caller names the preset when filing it in the user library.
        Ok(Preset {
            name: String::new(),
            base_prompt: style.base_prompt,
            negative_prompt: style.negative_prompt,
            aspect_ratio: style.aspect_ratio,
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzedStyle {
    base_prompt: String,
    #[serde(default)]
    negative_prompt: String,
    #[serde(default = "default_aspect_ratio")]
    aspect_ratio: String,
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    fn first_image(&self) -> Option<EncodedImage> {
        self.parts().find_map(|part| {
            part.inline_data
                .as_ref()
                .map(|data| EncodedImage::from_base64(&data.mime_type, data.data.clone()))
        })
    }

    fn first_text(&self) -> Option<String> {
        self.parts().find_map(|part| part.text.clone())
    }
}

/// Models wrap JSON answers in markdown fences often enough that we strip
/// them before parsing.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches('\n')
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
