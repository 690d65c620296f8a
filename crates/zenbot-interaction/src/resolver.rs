//! FallbackResolver - turns a conversation into a reply, whatever happens.
//!
//! Models are tried in configured order with one call each. A quota signal
//! delays the move to the next model by a fixed backoff; nothing is retried.
//! When no model yields usable text, or no credential is configured, the reply
//! comes from the fallback table instead. Panics inside a provider are caught
//! and reported as an `error` reply.

use crate::provider::ProviderClient;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use zenbot_core::fallback::APOLOGY;
use zenbot_core::{
    FallbackStyle, Message, ProviderConfig, ProviderKind, Reply, ResolveError, latest_content,
};

/// Tunables for one resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Model identifiers, highest priority first.
    pub models: Vec<String>,
    pub attempt_timeout: Duration,
    pub quota_backoff: Duration,
    /// Replies with fewer characters (after trimming) count as empty.
    pub min_reply_chars: usize,
    pub fallback: FallbackStyle,
}

impl ResolverSettings {
    pub fn from_config(kind: ProviderKind, config: &ProviderConfig, fallback: FallbackStyle) -> Self {
        Self {
            models: config.models_or_default(kind),
            attempt_timeout: config.attempt_timeout(),
            quota_backoff: config.quota_backoff(),
            min_reply_chars: config.min_reply_chars,
            fallback,
        }
    }
}

/// Drives one provider through its model list and substitutes canned replies.
pub struct FallbackResolver {
    provider_name: String,
    client: Option<Arc<dyn ProviderClient>>,
    settings: ResolverSettings,
}

impl FallbackResolver {
    /// `client` is `None` when no credential is configured; every call then
    /// answers from the fallback table without touching the network.
    pub fn new(
        provider_name: impl Into<String>,
        client: Option<Arc<dyn ProviderClient>>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            client,
            settings,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Returns a reply for `history`. Never fails and never panics.
    pub async fn resolve(&self, history: &[Message]) -> Reply {
        match AssertUnwindSafe(self.resolve_inner(history))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    provider = %self.provider_name,
                    error = %message,
                    "Resolver panicked, returning apology"
                );
                Reply::error(APOLOGY, message)
            }
        }
    }

    async fn resolve_inner(&self, history: &[Message]) -> Reply {
        let latest = latest_content(history);

        let Some(client) = self.client.as_deref() else {
            let err = ResolveError::configuration(format!(
                "{} credential is not configured",
                self.provider_name
            ));
            info!(
                provider = %self.provider_name,
                error_kind = err.kind(),
                "No credential configured, using fallback response"
            );
            return Reply::fallback(self.fallback_text(latest));
        };

        match self.attempt_models(client, history).await {
            Ok(text) => Reply::provider(text),
            Err(err) => {
                warn!(
                    provider = %self.provider_name,
                    error_kind = err.kind(),
                    error = %err,
                    "No usable provider reply, using fallback response"
                );
                Reply::fallback(self.fallback_text(latest)).with_error(err.to_string())
            }
        }
    }

    async fn attempt_models(
        &self,
        client: &dyn ProviderClient,
        history: &[Message],
    ) -> Result<String, ResolveError> {
        let models = &self.settings.models;
        let mut last_error = ResolveError::configuration(format!(
            "no models configured for {}",
            self.provider_name
        ));

        for (index, model) in models.iter().enumerate() {
            match self.attempt(client, model, history).await {
                Ok(body) => {
                    info!(provider = %self.provider_name, model = %model, "Provider call succeeded");
                    return self.usable_text(client, &body);
                }
                Err(err) => {
                    warn!(
                        provider = %self.provider_name,
                        model = %model,
                        error_kind = err.kind(),
                        error = %err,
                        "Model attempt failed"
                    );
                    let has_next = index + 1 < models.len();
                    if has_next && err.is_quota() {
                        debug!(
                            backoff_ms = self.settings.quota_backoff.as_millis() as u64,
                            "Quota signal, backing off before next model"
                        );
                        tokio::time::sleep(self.settings.quota_backoff).await;
                    }
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(
        &self,
        client: &dyn ProviderClient,
        model: &str,
        history: &[Message],
    ) -> Result<Value, ResolveError> {
        let timeout = self.settings.attempt_timeout;
        tokio::time::timeout(timeout, client.complete(model, history))
            .await
            .map_err(|_| {
                ResolveError::transport(format!(
                    "{} model {model} timed out after {}ms",
                    self.provider_name,
                    timeout.as_millis()
                ))
            })?
    }

    fn usable_text(&self, client: &dyn ProviderClient, body: &Value) -> Result<String, ResolveError> {
        let text = client.extract_text(body).unwrap_or_default();
        let length = text.trim().chars().count();
        if length < self.settings.min_reply_chars.max(1) {
            return Err(ResolveError::EmptyResult { length });
        }
        Ok(text)
    }

    fn fallback_text(&self, latest: &str) -> &'static str {
        let mut rng = rand::thread_rng();
        self.settings.fallback.choose(latest, &mut rng)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
