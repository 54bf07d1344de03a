//! VecSynth: multi-provider vector-art generation.
//!
//! The crate coordinates one generation request end to end: a per-mode
//! prompt is built deterministically, a backend is picked from the model
//! registry, fast text-only engines get one attempt with an automatic
//! fallback to the multimodal engine, and multimodal rate limits trigger a
//! single credential rotation and retry. Results are normalized into one
//! encoded-image shape regardless of how the provider answered.
//!
//! Credentials and user collections are plain values passed in and handed
//! back updated; the engine itself never touches storage.

pub mod config;
pub mod error;
pub mod library;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod presets;
pub mod prompt;
pub mod providers;
pub mod registry;

pub use config::{CredentialRing, Credentials, RotationOutcome};
pub use error::{Error, Result};
pub use library::{Gallery, StyleLibrary};
pub use logger::{Journal, JournalEntry, LogSeverity, LoggerConfig};
pub use models::{
    ChatMessage, ChatRole, EncodedImage, EngineRoute, GenerationOutcome, GenerationRequest,
};
pub use orchestrator::Orchestrator;
pub use presets::{catalog, fallback_preset, Preset, StyleCategory};
pub use prompt::{GenerationContext, Mode};
pub use registry::{model_registry, validate_model_call, ModelInfo, Provider};
