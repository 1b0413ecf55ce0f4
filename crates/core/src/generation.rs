//! Generation input resolution and credit pricing.
//!
//! A song row stores up to four free-text fields. Exactly one of three
//! input shapes must be resolvable from the populated fields, and that
//! shape determines which inference endpoint is called and what the
//! request costs. Resolution runs twice: at enqueue time (so an
//! unresolvable submission is rejected before a row exists) and again
//! inside the orchestrator from the re-read row.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Credit cost when the inference service writes the lyrics
/// (full-description and described-lyrics modes).
pub const CREDITS_AI_LYRICS: i32 = 80;

/// Credit cost when the user supplies the lyrics verbatim.
pub const CREDITS_MANUAL_LYRICS: i32 = 50;

/// Pass-through generation parameters, sent verbatim to the inference
/// service. Field names match the remote API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infer_step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumental: Option<bool>,
}

/// The three mutually exclusive input shapes, resolved once at submission
/// time into a tagged union instead of re-inspected ad hoc downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationInput {
    /// A single free-text song description; the service writes both the
    /// style prompt and the lyrics.
    FromDescription { full_described_song: String },
    /// A style prompt plus explicit, user-written lyrics.
    WithLyrics { prompt: String, lyrics: String },
    /// A style prompt plus a description of the lyrics to write.
    FromDescribedLyrics {
        prompt: String,
        described_lyrics: String,
    },
}

impl GenerationInput {
    /// Resolve an input shape from the raw song fields.
    ///
    /// Fixed precedence: a full description wins, then prompt + explicit
    /// lyrics, then prompt + lyrics description. Blank or whitespace-only
    /// fields count as absent. If no shape resolves this is a
    /// configuration error — fatal and unretryable.
    pub fn resolve(
        full_described_song: Option<&str>,
        prompt: Option<&str>,
        lyrics: Option<&str>,
        described_lyrics: Option<&str>,
    ) -> Result<Self, CoreError> {
        let full_described_song = non_blank(full_described_song);
        let prompt = non_blank(prompt);
        let lyrics = non_blank(lyrics);
        let described_lyrics = non_blank(described_lyrics);

        if let Some(description) = full_described_song {
            return Ok(Self::FromDescription {
                full_described_song: description.to_string(),
            });
        }
        if let (Some(prompt), Some(lyrics)) = (prompt, lyrics) {
            return Ok(Self::WithLyrics {
                prompt: prompt.to_string(),
                lyrics: lyrics.to_string(),
            });
        }
        if let (Some(prompt), Some(described)) = (prompt, described_lyrics) {
            return Ok(Self::FromDescribedLyrics {
                prompt: prompt.to_string(),
                described_lyrics: described.to_string(),
            });
        }

        Err(CoreError::Configuration(
            "No generation input shape resolvable: expected a full song description, \
             a prompt with lyrics, or a prompt with a lyrics description"
                .to_string(),
        ))
    }

    /// Credit cost of this input shape, captured on the song row at
    /// submission time. AI-written lyrics cost more than manual lyrics.
    pub fn required_credits(&self) -> i32 {
        match self {
            Self::FromDescription { .. } | Self::FromDescribedLyrics { .. } => CREDITS_AI_LYRICS,
            Self::WithLyrics { .. } => CREDITS_MANUAL_LYRICS,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
