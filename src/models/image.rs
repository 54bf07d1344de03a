use crate::error::{Error, Result};
use crate::presets::Preset;
use crate::prompt::Mode;
use crate::registry::Provider;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// A raster image as a base64 payload plus its mime type, the one canonical
/// form every provider response is normalized into. Equality is exact
/// encoded-byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl EncodedImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn from_base64(mime_type: &str, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: data.into(),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::Response(format!("not a data URI: {}", truncate(uri))))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| Error::Response(format!("not a base64 data URI: {}", truncate(uri))))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode back to raw bytes (for writing to disk).
    pub fn decode(&self) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Response(format!("invalid base64 image data: {}", e)))
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(32).collect()
}

/// One generation request, constructed fresh per trigger.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub mode: Mode,
    /// Raw user text; mode defaults and quoting are applied by the engine.
    pub text: String,
    /// `None` means the vectorize fallback preset (other modes require one).
    pub preset: Option<Preset>,
    pub reference: Option<EncodedImage>,
    /// Derived by the caller (the UI flips it after repeated generations on
    /// the same reference).
    pub strict_fidelity: bool,
    /// Registry id of the user's selected model.
    pub model_id: String,
}

impl GenerationRequest {
    pub fn new(mode: Mode, text: impl Into<String>) -> Self {
        Self {
            mode,
            text: text.into(),
            preset: None,
            reference: None,
            strict_fidelity: false,
            model_id: mode.default_model_id().to_string(),
        }
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_reference(mut self, reference: EncodedImage) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_strict_fidelity(mut self, strict: bool) -> Self {
        self.strict_fidelity = strict;
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

/// Which path actually produced the image. Returned with every result so
/// callers see fallbacks instead of inferring them from mutated selection
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRoute {
    /// The selected fast engine answered.
    FastEngine(Provider),
    /// The multimodal engine was the planned path (selected, or bypass).
    Multimodal,
    /// The fast engine failed and the multimodal engine covered for it.
    MultimodalFallback,
}

/// A completed generation: the image plus the preset used, for provenance
/// display.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub image: EncodedImage,
    pub preset_name: String,
    pub route: EngineRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trip() {
        let image = EncodedImage::from_bytes("image/png", b"\x89PNG fake");
        let uri = image.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));
        let back = EncodedImage::from_data_uri(&uri).unwrap();
        assert_eq!(back, image);
        assert_eq!(back.decode().unwrap(), b"\x89PNG fake");
    }

    #[test]
    fn rejects_non_data_uris() {
        assert!(EncodedImage::from_data_uri("https://example.com/x.png").is_err());
        assert!(EncodedImage::from_data_uri("data:image/png,rawbytes").is_err());
    }

    #[test]
    fn equality_is_exact_byte_equality() {
        let a = EncodedImage::from_bytes("image/png", b"same");
        let b = EncodedImage::from_bytes("image/png", b"same");
        let c = EncodedImage::from_bytes("image/png", b"different");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn request_defaults_follow_the_mode() {
        let request = GenerationRequest::new(Mode::Lettering, "hello");
        assert_eq!(request.model_id, "stability-ai");
        assert!(!request.strict_fidelity);

        let request = GenerationRequest::new(Mode::Vectorize, "");
        assert_eq!(request.model_id, "gemini");
    }
}
