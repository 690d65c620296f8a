//! Provider clients and the fallback resolver that drives them.

mod http;

pub mod gemini_api_provider;
pub mod huggingface_api_provider;
pub mod openai_api_provider;
pub mod provider;
pub mod resolver;
pub mod scripted_responder;

pub use gemini_api_provider::GeminiApiProvider;
pub use huggingface_api_provider::HuggingFaceApiProvider;
pub use openai_api_provider::OpenAIApiProvider;
pub use provider::ProviderClient;
pub use resolver::{FallbackResolver, ResolverSettings};
pub use scripted_responder::ScriptedResponder;
