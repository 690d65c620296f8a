//! Error types for ZenBot.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a provider could not produce a live reply.
///
/// Every variant is recoverable: the resolver turns each one into a fallback
/// reply. The variant only changes how the failure is logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No usable credential or model list for the provider
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection failure, DNS failure or timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success status or unreadable body
    #[error("Provider error: {message}")]
    Provider {
        status_code: Option<u16>,
        message: String,
    },

    /// Response carried no text, or text below the minimum length
    #[error("Empty result: {length} usable characters")]
    EmptyResult { length: usize },
}

impl ResolveError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn provider(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Provider {
            status_code,
            message: message.into(),
        }
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::Provider { .. } => "provider",
            Self::EmptyResult { .. } => "empty_result",
        }
    }

    /// Whether the provider signalled a quota or rate-limit condition.
    pub fn is_quota(&self) -> bool {
        match self {
            Self::Provider {
                status_code: Some(429),
                ..
            } => true,
            Self::Provider { message, .. } => {
                let lower = message.to_lowercase();
                lower.contains("quota")
                    || lower.contains("rate limit")
                    || lower.contains("resource_exhausted")
                    || lower.contains("resource exhausted")
            }
            _ => false,
        }
    }
}

/// Errors raised while loading [`crate::AppConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration file at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
