//! GeminiApiProvider - REST client for the Gemini `generateContent` API.
//!
//! The API key travels as a `key` query parameter, so request URLs are only
//! ever logged in redacted form.

use crate::http::{build_client, redact, send_json};
use crate::provider::ProviderClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use zenbot_core::persona::SYSTEM_PROMPT;
use zenbot_core::{Message, ResolveError, Role};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiApiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ResolveError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Points the client at another endpoint root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Lists the model identifiers this key can use, without the `models/` prefix.
    pub async fn list_models(&self) -> Result<Vec<String>, ResolveError> {
        let url = format!("{}/models", self.base_url);
        debug!(url = %url, "Listing Gemini models");

        let body = send_json(
            self.client
                .get(&url)
                .query(&[("key", self.api_key.as_str())]),
            self.name(),
        )
        .await?;

        let listing: ModelList = serde_json::from_value(body).map_err(|err| {
            ResolveError::provider(None, format!("Failed to parse Gemini model list: {err}"))
        })?;

        let models: Vec<String> = listing
            .models
            .into_iter()
            .map(|model| {
                model
                    .name
                    .strip_prefix("models/")
                    .map(str::to_string)
                    .unwrap_or(model.name)
            })
            .collect();
        info!(count = models.len(), "Gemini models available");
        Ok(models)
    }

    fn build_request(history: &[Message]) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|message| Content {
                role: Some(match message.role {
                    Role::User => "user".to_string(),
                    Role::Assistant => "model".to_string(),
                }),
                parts: vec![Part {
                    text: message.content.clone(),
                }],
            })
            .collect();

        if contents.is_empty() {
            contents.push(Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: String::new(),
                }],
            });
        }

        GenerateContentRequest {
            contents,
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 1024,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
                })
                .collect(),
        }
    }
}

/// Whether `model` appears in a listing, with or without the `models/` prefix.
pub fn is_model_available(available: &[String], model: &str) -> bool {
    let bare = model.strip_prefix("models/").unwrap_or(model);
    available
        .iter()
        .any(|name| name == bare || name.strip_prefix("models/") == Some(bare))
}

#[async_trait]
impl ProviderClient for GeminiApiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, model: &str, history: &[Message]) -> Result<Value, ResolveError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        debug!(
            endpoint = %redact(&format!("{url}?key={}", self.api_key), &self.api_key),
            "Calling Gemini"
        );

        let request = Self::build_request(history);
        send_json(
            self.client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&request),
            self.name(),
        )
        .await
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}
