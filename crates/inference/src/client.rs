//! HTTP client for the remote generation service.

use std::time::Duration;

use async_trait::async_trait;

use odeon_core::generation::{GenerationInput, GenerationParams};

use crate::types::{GenerationOutput, GenerationRequestBody};
use crate::{InferenceBackend, InferenceError};

/// Header carrying the shared API key.
const KEY_HEADER: &str = "Modal-Key";

/// Header carrying the shared API secret.
const SECRET_HEADER: &str = "Modal-Secret";

/// Default end-to-end timeout for one generation call. Generation can
/// take minutes; this bounds a hung connection, not normal work.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// How much of an error response body to keep in the error message.
const ERROR_BODY_LIMIT: usize = 512;

/// Configuration for the generation service endpoints.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Endpoint for the full-description mode.
    pub description_url: String,
    /// Endpoint for the prompt + explicit lyrics mode.
    pub lyrics_url: String,
    /// Endpoint for the prompt + described lyrics mode.
    pub described_lyrics_url: String,
    /// Shared API key, sent as the `Modal-Key` header.
    pub api_key: String,
    /// Shared API secret, sent as the `Modal-Secret` header.
    pub api_secret: String,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl InferenceConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                          | Meaning                         |
    /// |----------------------------------|---------------------------------|
    /// | `GENERATE_FROM_DESCRIPTION`      | full-description endpoint URL   |
    /// | `GENERATE_WITH_LYRICS`           | explicit-lyrics endpoint URL    |
    /// | `GENERATE_FROM_DESCRIBED_LYRICS` | described-lyrics endpoint URL   |
    /// | `MODAL_KEY`                      | shared API key                  |
    /// | `MODAL_SECRET`                   | shared API secret               |
    /// | `INFERENCE_TIMEOUT_SECS`         | per-call timeout (default 600)  |
    pub fn from_env() -> Self {
        let require = |var: &str| -> String {
            std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
        };

        let timeout_secs: u64 = std::env::var("INFERENCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("INFERENCE_TIMEOUT_SECS must be a valid u64");

        Self {
            description_url: require("GENERATE_FROM_DESCRIPTION"),
            lyrics_url: require("GENERATE_WITH_LYRICS"),
            described_lyrics_url: require("GENERATE_FROM_DESCRIBED_LYRICS"),
            api_key: require("MODAL_KEY"),
            api_secret: require("MODAL_SECRET"),
            timeout_secs,
        }
    }
}

/// Production [`InferenceBackend`] speaking HTTP/JSON to the generation
/// service.
pub struct InferenceClient {
    http: reqwest::Client,
    config: InferenceConfig,
}

impl InferenceClient {
    /// Build a client with its own connection pool and request timeout.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// The endpoint URL selected by the resolved input shape.
    pub fn endpoint_for(&self, input: &GenerationInput) -> &str {
        match input {
            GenerationInput::FromDescription { .. } => &self.config.description_url,
            GenerationInput::WithLyrics { .. } => &self.config.lyrics_url,
            GenerationInput::FromDescribedLyrics { .. } => &self.config.described_lyrics_url,
        }
    }
}

#[async_trait]
impl InferenceBackend for InferenceClient {
    async fn generate(
        &self,
        input: &GenerationInput,
        params: &GenerationParams,
    ) -> Result<GenerationOutput, InferenceError> {
        let endpoint = self.endpoint_for(input).to_string();
        let body = GenerationRequestBody::new(input, params);

        tracing::info!(endpoint = %endpoint, "Submitting generation request");

        let response = self
            .http
            .post(&endpoint)
            .header(KEY_HEADER, &self.config.api_key)
            .header(SECRET_HEADER, &self.config.api_secret)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(ERROR_BODY_LIMIT);
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let output: GenerationOutput = serde_json::from_str(&text)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        tracing::info!(
            storage_key = %output.storage_key,
            categories = output.categories.len(),
            "Generation request completed",
        );

        Ok(output)
    }
}
