pub mod byteplus;
pub mod gemini;
pub mod openai;
pub mod stability;

use crate::error::{Error, Result};
use crate::models::{ChatMessage, EncodedImage};
use crate::presets::Preset;
use async_trait::async_trait;

pub use byteplus::ArkClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use stability::StabilityClient;

/// Provider-agnostic quality clauses appended to every image request so
/// baseline output quality never depends on the preset.
pub(crate) const ARTISTIC_MODIFIERS: &str = "Ultra high-resolution, sharp focus, physically-based rendering (PBR), studio lighting, hyper-detailed, 8K, cinematic, professional color grading, flawless composition.";

pub(crate) const NEGATIVE_MODIFIERS: &str = "Blurry, out of focus, low-resolution, noisy, grainy, watermark, signature, text, amateur, oversaturated, distorted, deformed, ugly, disfigured, poorly drawn, bad anatomy, wrong anatomy, extra limb, missing limb, floating limbs, disconnected limbs, mutation, mutated, ugly, disgusting, amputation.";

/// A text-only "fast" generation engine.
#[async_trait]
pub trait TextToImage: Send + Sync {
    async fn generate(&self, prompt: &str, preset: &Preset, api_key: &str) -> Result<EncodedImage>;
}

/// The engine that can condition on pixels: image-aware generation plus
/// style analysis.
#[async_trait]
pub trait Multimodal: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        preset: &Preset,
        reference: Option<&EncodedImage>,
        api_key: &str,
    ) -> Result<EncodedImage>;

    async fn analyze_style(&self, image: &EncodedImage, api_key: &str) -> Result<Preset>;
}

/// The conversational design assistant.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], api_key: &str) -> Result<String>;
}

/// Positive prompt in the shared shape: user subject, preset style clause,
/// quality clauses.
pub(crate) fn styled_prompt(prompt: &str, preset: &Preset) -> String {
    format!("{}. {}. {}", prompt, preset.base_prompt, ARTISTIC_MODIFIERS)
}

/// Negative prompt in the shared shape: preset avoidances plus the fixed
/// anti-artifact clauses.
pub(crate) fn negative_prompt(preset: &Preset) -> String {
    format!("{} {}", preset.negative_prompt, NEGATIVE_MODIFIERS)
}

pub(crate) fn request_error(provider: &'static str, err: reqwest::Error) -> Error {
    Error::Request(format!("{} request failed: {}", provider, err))
}
