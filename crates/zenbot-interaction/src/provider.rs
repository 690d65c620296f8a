use async_trait::async_trait;
use serde_json::Value;
use zenbot_core::{Message, ResolveError};

/// A hosted text-generation API.
///
/// Implementations hold only immutable state (HTTP client, credential, base
/// URL); the model identifier is supplied per call so one instance can serve
/// concurrent requests.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Provider label used in logs.
    fn name(&self) -> &str;

    /// Sends one request for `model` and returns the decoded response body.
    ///
    /// Returns `Err` for transport failures, non-success statuses and bodies
    /// that are not JSON.
    async fn complete(&self, model: &str, history: &[Message]) -> Result<Value, ResolveError>;

    /// Pulls the generated text out of a successful response body.
    fn extract_text(&self, body: &Value) -> Option<String>;
}
