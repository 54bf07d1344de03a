use thiserror::Error;

/// Failures surfaced by the generation engine.
///
/// The first group is the taxonomy callers match on for user display. The
/// second group (`Api`, `Request`, `Response`) is produced by provider
/// adapters and classified into the taxonomy once, at the orchestrator
/// boundary. Adapters never swallow a provider error payload.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Please select a style preset first.")]
    MissingPreset,

    #[error("A {0} API key is required. Please add it in Settings.")]
    MissingCredential(&'static str),

    #[error("Model '{0}' is not registered.")]
    UnknownModel(String),

    #[error("The model rejected the prompt: {0}")]
    InvalidPrompt(String),

    #[error("The generation service is currently unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network blocked: {0}")]
    NetworkBlocked(String),

    #[error("{0}")]
    Unknown(String),

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Request error: {0}")]
    Request(String),

    #[error("Response error: {0}")]
    Response(String),
}

impl Error {
    /// Rate-limit detection. Structured status inspection first; the message
    /// fallback exists for providers that bury quota exhaustion in an error
    /// body instead of the status line.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Error::RateLimited(_) => true,
            Error::Api { status: 429, .. } => true,
            Error::Api { body, .. } => {
                body.contains("quota") || body.contains("RESOURCE_EXHAUSTED") || body.contains("429")
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
