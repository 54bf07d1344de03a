use serde::{Deserialize, Serialize};
use std::env;

/// Result of advancing the multimodal credential ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The cursor now points at the slot with this index.
    Rotated(usize),
    /// Every slot has been tried; the cursor was left unchanged.
    Exhausted,
}

/// Ordered credential slots for the multimodal provider plus the active
/// cursor.
///
/// Slots may be empty strings (unset). The cursor is always a valid index and
/// is part of the persisted value, so sessions resume on the last working
/// credential instead of re-triggering rate limits on slot 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRing {
    keys: Vec<String>,
    cursor: usize,
}

impl CredentialRing {
    pub fn new() -> Self {
        Self::from_keys(Vec::new())
    }

    /// An empty key list still yields one (unset) slot, so the cursor
    /// invariant holds from the start.
    pub fn from_keys(keys: Vec<String>) -> Self {
        let keys = if keys.is_empty() {
            vec![String::new()]
        } else {
            keys
        };
        Self { keys, cursor: 0 }
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor % self.keys.len();
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.iter().all(|k| k.is_empty())
    }

    /// The credential under the cursor, if that slot is set.
    pub fn active_key(&self) -> Option<&str> {
        let key = self.keys[self.cursor].as_str();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    /// Replace the credential in a slot. Out-of-range indexes are ignored.
    pub fn set_key(&mut self, index: usize, key: impl Into<String>) {
        if let Some(slot) = self.keys.get_mut(index) {
            *slot = key.into();
        }
    }

    /// Manually point the cursor at a slot (the Settings "switch node"
    /// action). Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.keys.len() {
            self.cursor = index;
        }
    }

    /// Advance to the next slot, wrapping to 0. Wrapping back onto an empty
    /// slot 0 means every credential has been tried: report exhaustion and
    /// leave the cursor where it was.
    pub fn rotate(&mut self) -> RotationOutcome {
        let next = (self.cursor + 1) % self.keys.len();
        if next == 0 && self.keys[0].is_empty() {
            return RotationOutcome::Exhausted;
        }
        self.cursor = next;
        RotationOutcome::Rotated(next)
    }
}

impl Default for CredentialRing {
    fn default() -> Self {
        Self::new()
    }
}

/// All provider credentials, passed into the engine as already-loaded values.
///
/// The engine mutates only the ring cursor; reading and writing whatever
/// store these live in is the caller's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub gemini: CredentialRing,
    pub stability_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ark_api_key: Option<String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the environment: `GEMINI_API_KEYS` (comma-separated slots,
    /// falling back to `GEMINI_API_KEY`), `GEMINI_ACTIVE_KEY_INDEX`,
    /// `STABILITY_API_KEY`, `OPENAI_API_KEY`, `ARK_API_KEY`.
    pub fn from_env() -> Self {
        let keys = env::var("GEMINI_API_KEYS")
            .map(|raw| raw.split(',').map(|k| k.trim().to_string()).collect())
            .or_else(|_| env::var("GEMINI_API_KEY").map(|k| vec![k]))
            .unwrap_or_default();

        let mut gemini = CredentialRing::from_keys(keys);
        if let Ok(raw) = env::var("GEMINI_ACTIVE_KEY_INDEX") {
            if let Ok(index) = raw.parse() {
                gemini.select(index);
            }
        }

        Credentials {
            gemini,
            stability_api_key: env::var("STABILITY_API_KEY").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            ark_api_key: env::var("ARK_API_KEY").ok(),
        }
    }

    pub fn with_gemini_keys(mut self, keys: Vec<String>) -> Self {
        self.gemini = CredentialRing::from_keys(keys);
        self
    }

    pub fn with_stability_key(mut self, key: impl Into<String>) -> Self {
        self.stability_api_key = Some(key.into());
        self
    }

    pub fn with_openai_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    pub fn with_ark_key(mut self, key: impl Into<String>) -> Self {
        self.ark_api_key = Some(key.into());
        self
    }
}
