use crate::config::Credentials;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The remote services the engine can dispatch to. Gemini is the only
/// multimodal one; the rest are text-only "fast" engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    GoogleGemini,
    StabilityAi,
    OpenAi,
    BytePlus,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::GoogleGemini => "Gemini",
            Provider::StabilityAi => "Stability AI",
            Provider::OpenAi => "OpenAI",
            Provider::BytePlus => "BytePlus",
        }
    }

    pub fn is_multimodal(&self) -> bool {
        matches!(self, Provider::GoogleGemini)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub provider: Provider,
    pub remote_model_id: Option<&'static str>,
    pub requires_api_key: bool,
}

static MODEL_REGISTRY: Lazy<HashMap<&'static str, ModelInfo>> = Lazy::new(|| {
    let models = [
        ModelInfo {
            id: "gemini",
            label: "Gemini",
            provider: Provider::GoogleGemini,
            remote_model_id: Some("gemini-2.5-flash-image"),
            requires_api_key: true,
        },
        ModelInfo {
            id: "stability-ai",
            label: "Stability AI (SD3)",
            provider: Provider::StabilityAi,
            remote_model_id: None,
            requires_api_key: true,
        },
        ModelInfo {
            id: "dall-e-3",
            label: "DALL-E 3",
            provider: Provider::OpenAi,
            remote_model_id: Some("dall-e-3"),
            requires_api_key: true,
        },
        ModelInfo {
            id: "seedream",
            label: "Seedream",
            provider: Provider::BytePlus,
            remote_model_id: Some("seedream-4-5-251128"),
            requires_api_key: true,
        },
    ];
    models.into_iter().map(|m| (m.id, m)).collect()
});

/// All registered models, keyed by id. Loaded once, never mutated.
pub fn model_registry() -> &'static HashMap<&'static str, ModelInfo> {
    &MODEL_REGISTRY
}

/// Look up a model and confirm the credential it needs is configured.
///
/// Pure lookup: fails with [`Error::UnknownModel`] for unregistered ids and
/// [`Error::MissingCredential`] naming the provider when a required key is
/// absent or empty.
pub fn validate_model_call(model_id: &str, credentials: &Credentials) -> Result<&'static ModelInfo> {
    let info = MODEL_REGISTRY
        .get(model_id)
        .ok_or_else(|| Error::UnknownModel(model_id.to_string()))?;

    if info.requires_api_key {
        let has_key = match info.provider {
            Provider::GoogleGemini => credentials.gemini.active_key().is_some(),
            Provider::StabilityAi => non_empty(&credentials.stability_api_key),
            Provider::OpenAi => non_empty(&credentials.openai_api_key),
            Provider::BytePlus => non_empty(&credentials.ark_api_key),
        };
        if !has_key {
            return Err(Error::MissingCredential(info.provider.label()));
        }
    }

    Ok(info)
}

fn non_empty(key: &Option<String>) -> bool {
    key.as_deref().map_or(false, |k| !k.is_empty())
}
