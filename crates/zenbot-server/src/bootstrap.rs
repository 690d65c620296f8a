//! Builds the application state from configuration.

use crate::server::AppState;
use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tracing::{error, info, warn};
use zenbot_core::{AppConfig, FallbackStyle, ProviderConfig, ProviderKind, ResolveError};
use zenbot_interaction::gemini_api_provider::is_model_available;
use zenbot_interaction::{
    FallbackResolver, GeminiApiProvider, HuggingFaceApiProvider, OpenAIApiProvider,
    ProviderClient, ResolverSettings, ScriptedResponder,
};

/// Fallback style used by each provider route.
pub fn fallback_style(kind: ProviderKind) -> FallbackStyle {
    match kind {
        ProviderKind::Gemini => FallbackStyle::Flat,
        ProviderKind::OpenAi | ProviderKind::HuggingFace => FallbackStyle::Categorized,
    }
}

fn build_client(
    kind: ProviderKind,
    config: &ProviderConfig,
    api_key: &str,
) -> Result<Arc<dyn ProviderClient>, ResolveError> {
    let timeout = config.attempt_timeout();
    let client: Arc<dyn ProviderClient> = match kind {
        ProviderKind::OpenAi => {
            let mut client = OpenAIApiProvider::new(api_key, timeout)?;
            if let Some(url) = &config.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        ProviderKind::Gemini => {
            let mut client = GeminiApiProvider::new(api_key, timeout)?;
            if let Some(url) = &config.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        ProviderKind::HuggingFace => {
            let mut client = HuggingFaceApiProvider::new(api_key, timeout)?;
            if let Some(url) = &config.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
    };
    Ok(client)
}

/// Builds the resolver for one provider.
///
/// Returns `None` only when an HTTP client could not be constructed. A
/// missing credential still yields a resolver, one that always falls back.
pub fn build_resolver(kind: ProviderKind, config: &ProviderConfig) -> Option<Arc<FallbackResolver>> {
    let settings = ResolverSettings::from_config(kind, config, fallback_style(kind));

    let client = match config.credential() {
        Some(api_key) => match build_client(kind, config, api_key) {
            Ok(client) => Some(client),
            Err(err) => {
                error!(provider = kind.name(), error = %err, "Provider client unavailable");
                return None;
            }
        },
        None => {
            warn!(
                provider = kind.name(),
                "No credential configured, route will serve fallback responses"
            );
            None
        }
    };

    info!(
        provider = kind.name(),
        models = ?settings.models,
        live = client.is_some(),
        "Resolver ready"
    );
    Some(Arc::new(FallbackResolver::new(kind.name(), client, settings)))
}

pub fn build_state(config: &AppConfig) -> AppState {
    AppState {
        chat: build_resolver(ProviderKind::OpenAi, &config.openai),
        gemini: build_resolver(ProviderKind::Gemini, &config.gemini),
        huggingface: build_resolver(ProviderKind::HuggingFace, &config.huggingface),
        scripted: ScriptedResponder::new(config.mock.delay()),
    }
}

/// Lists the Gemini models the key can use and warns about configured
/// models that are missing from that list.
pub async fn check_models(config: &AppConfig) -> Result<()> {
    let Some(api_key) = config.gemini.credential() else {
        bail!("GEMINI_API_KEY is not configured");
    };

    let mut client = GeminiApiProvider::new(api_key, config.gemini.attempt_timeout())?;
    if let Some(url) = &config.gemini.base_url {
        client = client.with_base_url(url);
    }

    let available = client
        .list_models()
        .await
        .context("Failed to list Gemini models")?;
    for model in &available {
        info!("available: {model}");
    }

    let configured = config.gemini.models_or_default(ProviderKind::Gemini);
    let missing: Vec<&String> = configured
        .iter()
        .filter(|model| !is_model_available(&available, model))
        .collect();
    for model in &missing {
        warn!("configured model {model} is not offered for this key");
    }
    info!(
        configured = configured.len(),
        missing = missing.len(),
        "Model check finished"
    );
    Ok(())
}
