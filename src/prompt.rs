use crate::models::EncodedImage;
use crate::presets::Preset;
use serde::{Deserialize, Serialize};

/// The creative modes. Each one owns a prompt recipe; dispatch is a plain
/// match, so a new mode is a new variant plus its clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Vectorize,
    Lettering,
    Monogram,
    Analyze,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Vectorize => "Vectorize",
            Mode::Lettering => "Core Lettering",
            Mode::Monogram => "Monogram",
            Mode::Analyze => "Analyzer",
        }
    }

    /// The model a mode starts on. Applied when the user switches modes,
    /// never re-applied at generation time; the user's per-request override
    /// always wins.
    pub fn default_model_id(&self) -> &'static str {
        match self {
            Mode::Vectorize | Mode::Analyze => "gemini",
            Mode::Lettering | Mode::Monogram => "stability-ai",
        }
    }
}

/// Everything a prompt is built from. Builders read only this, never
/// catalogs, credentials, or any other ambient state.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub prompt: String,
    pub preset: Preset,
    pub reference: Option<EncodedImage>,
    pub strict_fidelity: bool,
}

const TECHNICAL_CLAUSE: &str = "Technical details: ultra-clean vector lines, sharp edges, flat solid colors, high contrast, professional composition, 8k resolution, minimalist aesthetic.";

const STRICT_FIDELITY_CLAUSE: &str = "STRICTLY COPY the reference image subject. Do not alter the pose, composition, or key features. High fidelity to source subject is required.";

const LOOSE_FIDELITY_CLAUSE: &str =
    "Maintain the composition, pose, and main features of the reference image.";

/// Assemble the final prompt for a mode: lead-in, preset style clause, the
/// shared technical clause, then the mode's closing emphasis. Deterministic:
/// identical context, identical string.
pub fn build_prompt(mode: Mode, ctx: &GenerationContext) -> String {
    let mut prompt = match &ctx.reference {
        None => format!(
            "Professional high-end graphic design: {}. Style: {}. {}",
            ctx.prompt, ctx.preset.base_prompt, TECHNICAL_CLAUSE
        ),
        // Vectorizing an image means tracing what is there, not inventing
        // new content, so its lead-in differs from every other mode.
        Some(_) if mode == Mode::Vectorize => format!(
            "Convert this image to vector art. Trace the lines and shapes of the subject exactly as they appear. Do not generate new subjects or change the content. Output a clean, high-quality vector illustration of the input image. {} Style: {}. {}",
            fidelity_clause(ctx.strict_fidelity),
            ctx.preset.base_prompt,
            TECHNICAL_CLAUSE
        ),
        Some(_) => format!(
            "Vectorize this exact subject: {}. {} Style: {}. {}",
            ctx.prompt,
            fidelity_clause(ctx.strict_fidelity),
            ctx.preset.base_prompt,
            TECHNICAL_CLAUSE
        ),
    };

    if let Some(closing) = closing_clause(mode) {
        prompt.push(' ');
        prompt.push_str(closing);
    }

    prompt
}

/// Whether the fast engines must be skipped for this request. True exactly
/// when a reference image is present: text-only engines would ignore the
/// pixels, and the point of a reference is conditioning on them.
pub fn bypass_fast_engine(ctx: &GenerationContext) -> bool {
    ctx.reference.is_some()
}

/// Normalize raw user text for a mode: empty input gets the mode's default
/// directive, and lettering/monogram input is quoted so the engines render
/// the words instead of interpreting them.
pub fn effective_text(mode: Mode, raw: &str) -> String {
    if raw.is_empty() {
        return match mode {
            Mode::Vectorize => "vectorize this image".to_string(),
            _ => "Artistic Text".to_string(),
        };
    }

    match mode {
        Mode::Lettering | Mode::Monogram
            if !raw.starts_with('"') && !raw.ends_with('"') =>
        {
            format!("\"{}\"", raw)
        }
        _ => raw.to_string(),
    }
}

fn fidelity_clause(strict: bool) -> &'static str {
    if strict {
        STRICT_FIDELITY_CLAUSE
    } else {
        LOOSE_FIDELITY_CLAUSE
    }
}

fn closing_clause(mode: Mode) -> Option<&'static str> {
    match mode {
        Mode::Lettering => Some(
            "Focus on typography, clear legible text, custom lettering design, font layout.",
        ),
        Mode::Monogram => Some(
            "Focus on interlocking letters, symbol design, logo mark, geometric synthesis.",
        ),
        Mode::Vectorize | Mode::Analyze => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::fallback_preset;

    const ALL_MODES: [Mode; 4] = [Mode::Vectorize, Mode::Lettering, Mode::Monogram, Mode::Analyze];

    fn ctx(reference: bool, strict: bool) -> GenerationContext {
        GenerationContext {
            prompt: "a red fox".to_string(),
            preset: fallback_preset(),
            reference: reference.then(|| EncodedImage::from_bytes("image/png", b"px")),
            strict_fidelity: strict,
        }
    }

    #[test]
    fn build_prompt_is_deterministic_for_every_mode() {
        for mode in ALL_MODES {
            for reference in [false, true] {
                for strict in [false, true] {
                    let a = build_prompt(mode, &ctx(reference, strict));
                    let b = build_prompt(mode, &ctx(reference, strict));
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn bypass_tracks_reference_presence() {
        assert!(!bypass_fast_engine(&ctx(false, false)));
        assert!(bypass_fast_engine(&ctx(true, false)));
        assert!(bypass_fast_engine(&ctx(true, true)));
    }

    #[test]
    fn text_only_prompt_carries_all_sections_in_order() {
        let prompt = build_prompt(Mode::Vectorize, &ctx(false, false));
        assert!(prompt.starts_with("Professional high-end graphic design: a red fox."));
        let style = prompt.find("Style:").unwrap();
        let technical = prompt.find("Technical details:").unwrap();
        assert!(style < technical);
    }

    #[test]
    fn vectorize_reference_lead_in_traces_instead_of_inventing() {
        let prompt = build_prompt(Mode::Vectorize, &ctx(true, false));
        assert!(prompt.starts_with("Convert this image to vector art."));
        assert!(prompt.contains("Do not generate new subjects"));
        assert!(!prompt.contains("a red fox"));
    }

    #[test]
    fn other_modes_keep_the_subject_when_a_reference_is_present() {
        let prompt = build_prompt(Mode::Lettering, &ctx(true, false));
        assert!(prompt.starts_with("Vectorize this exact subject: a red fox."));
    }

    #[test]
    fn fidelity_wording_switches_on_the_strict_flag() {
        let loose = build_prompt(Mode::Monogram, &ctx(true, false));
        assert!(loose.contains("Maintain the composition, pose, and main features"));
        assert!(!loose.contains("STRICTLY COPY"));

        let strict = build_prompt(Mode::Monogram, &ctx(true, true));
        assert!(strict.contains("STRICTLY COPY the reference image subject."));
    }

    #[test]
    fn closing_clauses_are_mode_specific() {
        let lettering = build_prompt(Mode::Lettering, &ctx(false, false));
        assert!(lettering.ends_with("custom lettering design, font layout."));

        let monogram = build_prompt(Mode::Monogram, &ctx(false, false));
        assert!(monogram.ends_with("logo mark, geometric synthesis."));

        let vectorize = build_prompt(Mode::Vectorize, &ctx(false, false));
        assert!(vectorize.ends_with(TECHNICAL_CLAUSE));
    }

    #[test]
    fn empty_text_defaults_depend_on_the_mode() {
        assert_eq!(effective_text(Mode::Vectorize, ""), "vectorize this image");
        assert_eq!(effective_text(Mode::Lettering, ""), "Artistic Text");
        assert_eq!(effective_text(Mode::Analyze, ""), "Artistic Text");
    }

    #[test]
    fn lettering_text_is_quoted_once() {
        assert_eq!(effective_text(Mode::Lettering, "Coffee"), "\"Coffee\"");
        assert_eq!(effective_text(Mode::Monogram, "\"AB\""), "\"AB\"");
        assert_eq!(effective_text(Mode::Vectorize, "Coffee"), "Coffee");
    }

    #[test]
    fn mode_defaults_pair_image_modes_with_the_fast_engine() {
        assert_eq!(Mode::Vectorize.default_model_id(), "gemini");
        assert_eq!(Mode::Analyze.default_model_id(), "gemini");
        assert_eq!(Mode::Lettering.default_model_id(), "stability-ai");
        assert_eq!(Mode::Monogram.default_model_id(), "stability-ai");
    }
}
