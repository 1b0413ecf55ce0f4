//! Wire types for the generation endpoints.
//!
//! Field names match the remote service exactly (`full_described_song`,
//! `s3_key`, `cover_image_s3_key`, ...). Internal code talks in terms of
//! storage keys; the serde renames keep the wire stable.

use serde::{Deserialize, Serialize};

use odeon_core::generation::{GenerationInput, GenerationParams};

/// JSON request body for any of the three generation endpoints.
///
/// Exactly one mode's text fields are populated, as determined by the
/// resolved [`GenerationInput`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_described_song: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub described_lyrics: Option<String>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

impl GenerationRequestBody {
    /// Build the outbound body for a resolved input shape.
    pub fn new(input: &GenerationInput, params: &GenerationParams) -> Self {
        let mut body = Self {
            params: params.clone(),
            ..Self::default()
        };
        match input {
            GenerationInput::FromDescription { full_described_song } => {
                body.full_described_song = Some(full_described_song.clone());
            }
            GenerationInput::WithLyrics { prompt, lyrics } => {
                body.prompt = Some(prompt.clone());
                body.lyrics = Some(lyrics.clone());
            }
            GenerationInput::FromDescribedLyrics {
                prompt,
                described_lyrics,
            } => {
                body.prompt = Some(prompt.clone());
                body.described_lyrics = Some(described_lyrics.clone());
            }
        }
        body
    }
}

/// Successful generation result.
///
/// Serialized into the orchestrator's durable step log, so it derives
/// `Serialize` as well; both directions use the wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    /// Object-store key of the rendered audio.
    #[serde(rename = "s3_key")]
    pub storage_key: String,
    /// Object-store key of the generated cover image.
    #[serde(rename = "cover_image_s3_key")]
    pub thumbnail_storage_key: String,
    /// Free-text category labels describing the result.
    pub categories: Vec<String>,
}
