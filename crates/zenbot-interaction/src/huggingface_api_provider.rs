//! HuggingFaceApiProvider - client for the hosted inference API.
//!
//! Conversational models on this API take a single text input, so the persona
//! prompt and the most recent messages are flattened into one transcript.

use crate::http::{build_client, send_json};
use crate::provider::ProviderClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use zenbot_core::persona::{ASSISTANT_NAME, SYSTEM_PROMPT};
use zenbot_core::{Message, ResolveError, Role};

const BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Number of trailing messages included in the transcript.
pub const CONTEXT_WINDOW: usize = 5;

/// Client for the hosted inference HTTP API.
#[derive(Clone)]
pub struct HuggingFaceApiProvider {
    client: Client,
    api_token: String,
    base_url: String,
}

impl HuggingFaceApiProvider {
    pub fn new(api_token: impl Into<String>, timeout: Duration) -> Result<Self, ResolveError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_token: api_token.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_transcript(history: &[Message]) -> String {
        let start = history.len().saturating_sub(CONTEXT_WINDOW);
        let mut transcript = format!("{SYSTEM_PROMPT}\n\n");
        for message in &history[start..] {
            let speaker = match message.role {
                Role::User => "User",
                Role::Assistant => ASSISTANT_NAME,
            };
            transcript.push_str(&format!("{speaker}: {}\n", message.content));
        }
        transcript
    }
}

#[async_trait]
impl ProviderClient for HuggingFaceApiProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(&self, model: &str, history: &[Message]) -> Result<Value, ResolveError> {
        let url = format!("{}/{model}", self.base_url);
        debug!(endpoint = %url, "Calling Hugging Face inference");

        let request = InferenceRequest {
            inputs: Self::build_transcript(history),
        };
        send_json(
            self.client
                .post(&url)
                .bearer_auth(&self.api_token)
                .json(&request),
            self.name(),
        )
        .await
    }

    /// Reads `generated_text` from either the list or the object response
    /// shape and strips a leading speaker tag.
    fn extract_text(&self, body: &Value) -> Option<String> {
        let text = body
            .pointer("/0/generated_text")
            .or_else(|| body.get("generated_text"))
            .and_then(Value::as_str)?;

        let speaker_tag = format!("{ASSISTANT_NAME}:");
        let text = text.strip_prefix(speaker_tag.as_str()).unwrap_or(text);
        Some(text.trim().to_string())
    }
}

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
}
