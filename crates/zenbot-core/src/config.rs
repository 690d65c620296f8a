//! Configuration for ZenBot.
//!
//! Values come from an optional TOML file (`~/.config/zenbot/config.toml` by
//! default) and are then overlaid with environment variables. A missing
//! credential is a valid configuration: the affected routes answer from the
//! fallback table.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const PLACEHOLDER_KEYS: &[&str] = &["your_gemini_api_key_here"];

/// Providers ZenBot can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    HuggingFace,
}

impl ProviderKind {
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::HuggingFace => "huggingface",
        }
    }

    /// Model identifiers tried when none are configured, highest priority first.
    pub fn default_models(self) -> &'static [&'static str] {
        match self {
            ProviderKind::OpenAi => &["gpt-4o"],
            ProviderKind::Gemini => &["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"],
            ProviderKind::HuggingFace => &["microsoft/DialoGPT-medium"],
        }
    }

    fn env_prefix(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI",
            ProviderKind::Gemini => "GEMINI",
            ProviderKind::HuggingFace => "HF",
        }
    }

    fn key_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::HuggingFace => "HF_API_TOKEN",
        }
    }
}

/// Settings for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifiers in priority order. Empty means provider defaults.
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
    #[serde(default = "default_quota_backoff_ms")]
    pub quota_backoff_ms: u64,
    #[serde(default = "default_min_reply_chars")]
    pub min_reply_chars: usize,
}

fn default_attempt_timeout_secs() -> u64 {
    15
}

fn default_quota_backoff_ms() -> u64 {
    500
}

fn default_min_reply_chars() -> usize {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: Vec::new(),
            base_url: None,
            attempt_timeout_secs: default_attempt_timeout_secs(),
            quota_backoff_ms: default_quota_backoff_ms(),
            min_reply_chars: default_min_reply_chars(),
        }
    }
}

impl ProviderConfig {
    /// Returns the API key unless it is blank or a template placeholder.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(key))
    }

    /// Configured models, or the provider defaults when none are set.
    pub fn models_or_default(&self, kind: ProviderKind) -> Vec<String> {
        if self.models.is_empty() {
            kind.default_models().iter().map(|m| m.to_string()).collect()
        } else {
            self.models.clone()
        }
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    pub fn quota_backoff(&self) -> Duration {
        Duration::from_millis(self.quota_backoff_ms)
    }

    fn apply_env<F>(&mut self, kind: ProviderKind, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = kind.env_prefix();

        if let Some(key) = lookup(kind.key_var()) {
            self.api_key = Some(key);
        }
        if let Some(models) = lookup(&format!("{prefix}_MODELS")) {
            self.models = parse_list(&models);
        }
        if let Some(url) = lookup(&format!("{prefix}_BASE_URL")) {
            self.base_url = Some(url);
        }
        if let Some(secs) = lookup(&format!("{prefix}_TIMEOUT_SECS")) {
            let key = format!("{prefix}_TIMEOUT_SECS");
            self.attempt_timeout_secs = parse_number(&key, &secs)?;
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Scripted responder settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { delay_ms: 500 }
    }
}

impl MockConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub openai: ProviderConfig,
    pub gemini: ProviderConfig,
    pub huggingface: ProviderConfig,
    pub mock: MockConfig,
}

impl AppConfig {
    /// Loads the file at `path` (required to exist), or the default file if
    /// present, then applies the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "Loading configuration file");
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlays values from `lookup`, which maps variable names to values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("ZENBOT_BIND") {
            self.server.bind = bind;
        }
        self.openai.apply_env(ProviderKind::OpenAi, &lookup)?;
        self.gemini.apply_env(ProviderKind::Gemini, &lookup)?;
        self.huggingface
            .apply_env(ProviderKind::HuggingFace, &lookup)?;
        Ok(())
    }
}

/// Returns `~/.config/zenbot/config.toml` (platform config dir).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zenbot").join("config.toml"))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
