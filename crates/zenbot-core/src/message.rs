//! Conversation messages and the reply envelope returned to the chat UI.

use serde::{Deserialize, Deserializer, Serialize};

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    /// Any non-user author, including `system`.
    #[serde(other)]
    Assistant,
}

/// A single role-tagged message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Inbound body of every chat route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Returns the text of the trailing message, or `""` for an empty history.
pub fn latest_content(history: &[Message]) -> &str {
    history
        .last()
        .map(|message| message.content.as_str())
        .unwrap_or("")
}

/// Where the text of a [`Reply`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// Live text generated by a provider.
    Provider,
    /// Canned text substituted because no live answer was available.
    Fallback,
    /// Canned apology produced after an internal fault.
    Error,
    /// Scripted responder, never calls out.
    Mock,
}

/// Response body returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub response: String,
    pub source: ReplySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    fn new(response: impl Into<String>, source: ReplySource) -> Self {
        Self {
            response: response.into(),
            source,
            error: None,
        }
    }

    pub fn provider(response: impl Into<String>) -> Self {
        Self::new(response, ReplySource::Provider)
    }

    pub fn fallback(response: impl Into<String>) -> Self {
        Self::new(response, ReplySource::Fallback)
    }

    pub fn mock(response: impl Into<String>) -> Self {
        Self::new(response, ReplySource::Mock)
    }

    pub fn error(response: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(response, ReplySource::Error).with_error(error)
    }

    /// Attaches a diagnostic message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_content_empty_history() {
        assert_eq!(latest_content(&[]), "");
    }

    #[test]
    fn test_latest_content_uses_trailing_message() {
        let history = vec![
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
        ];
        assert_eq!(latest_content(&history), "second");
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"assistant"},{"content":"hey"}]}"#)
                .expect("request should parse");

        assert_eq!(request.messages[0], Message::assistant(""));
        assert_eq!(request.messages[1], Message::user("hey"));
    }

    #[test]
    fn test_request_tolerates_null_and_unknown_values() {
        let request: ChatRequest = serde_json::from_str(
            r#"{"messages":[
                {"role":"system","content":"be kind"},
                {"role":null,"content":null},
                {"role":"user","content":"I feel so anxious"}
            ]}"#,
        )
        .expect("request should parse");

        assert_eq!(request.messages[0], Message::assistant("be kind"));
        assert_eq!(request.messages[1], Message::user(""));
        assert_eq!(latest_content(&request.messages), "I feel so anxious");
    }

    #[test]
    fn test_reply_omits_absent_error() {
        let json = serde_json::to_value(Reply::provider("hi there")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "response": "hi there", "source": "provider" })
        );
    }

    #[test]
    fn test_reply_serializes_error() {
        let json = serde_json::to_value(Reply::fallback("ok").with_error("timeout")).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["error"], "timeout");
    }
}
