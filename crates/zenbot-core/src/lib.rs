pub mod category;
pub mod config;
pub mod error;
pub mod fallback;
pub mod message;
pub mod persona;

pub use category::{Category, classify};
pub use config::{AppConfig, ProviderConfig, ProviderKind};
pub use error::{ConfigError, ResolveError};
pub use fallback::FallbackStyle;
pub use message::{ChatRequest, Message, Reply, ReplySource, Role, latest_content};
