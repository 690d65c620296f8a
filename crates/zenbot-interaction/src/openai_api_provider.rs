//! OpenAIApiProvider - REST client for the OpenAI Chat Completions API.

use crate::http::{build_client, send_json};
use crate::provider::ProviderClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use zenbot_core::persona::SYSTEM_PROMPT;
use zenbot_core::{Message, ResolveError, Role};

const BASE_URL: &str = "https://api.openai.com/v1";
const MAX_TOKENS: u32 = 1024;

/// Client for the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIApiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ResolveError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(model: &str, history: &[Message]) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend(history.iter().map(|message| ChatMessage {
            role: match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: message.content.clone(),
        }));

        ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature: 0.7,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAIApiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, model: &str, history: &[Message]) -> Result<Value, ResolveError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(endpoint = %url, model, "Calling OpenAI");

        send_json(
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&Self::build_request(model, history)),
            self.name(),
        )
        .await
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> OpenAIApiProvider {
        OpenAIApiProvider::new("sk-test", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_request_prepends_system_prompt() {
        let history = vec![Message::user("I can't sleep"), Message::assistant("I'm sorry")];
        let body = serde_json::to_value(OpenAIApiProvider::build_request("gpt-4o", &history)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["content"], "I can't sleep");
        assert_eq!(body["messages"][2]["role"], "assistant");
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn test_extract_text() {
        let body = json!({ "choices": [{ "message": { "role": "assistant", "content": "I'm listening." } }] });
        assert_eq!(provider().extract_text(&body).as_deref(), Some("I'm listening."));
        assert_eq!(
            provider().extract_text(&json!({ "choices": [{ "message": { "content": null } }] })),
            None
        );
    }
}
