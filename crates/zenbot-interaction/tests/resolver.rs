use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use zenbot_core::fallback::{flat_responses, responses};
use zenbot_core::{Category, FallbackStyle, Message, ReplySource, ResolveError};
use zenbot_interaction::{FallbackResolver, ProviderClient, ResolverSettings};

/// What the scripted provider does for one model.
#[derive(Clone)]
enum Outcome {
    Text(&'static str),
    Fail(ResolveError),
    Hang,
    Panic,
}

/// Provider that replays a fixed outcome per model and records calls.
struct ScriptedProvider {
    outcomes: Vec<(&'static str, Outcome)>,
    calls: AtomicUsize,
    models_called: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<(&'static str, Outcome)>) -> Arc<Self> {
        Arc::new(Self {
            outcomes,
            calls: AtomicUsize::new(0),
            models_called: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn models_called(&self) -> Vec<String> {
        self.models_called.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, model: &str, _history: &[Message]) -> Result<Value, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models_called.lock().unwrap().push(model.to_string());

        let outcome = self
            .outcomes
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(Outcome::Fail(ResolveError::provider(Some(404), "unknown model")));

        match outcome {
            Outcome::Text(text) => Ok(json!({ "text": text })),
            Outcome::Fail(err) => Err(err),
            Outcome::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(json!({ "text": "too late to matter" }))
            }
            Outcome::Panic => panic!("provider exploded"),
        }
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.get("text").and_then(Value::as_str).map(str::to_string)
    }
}

fn settings(models: &[&str], fallback: FallbackStyle) -> ResolverSettings {
    ResolverSettings {
        models: models.iter().map(|m| m.to_string()).collect(),
        attempt_timeout: Duration::from_millis(200),
        quota_backoff: Duration::from_millis(150),
        min_reply_chars: 10,
        fallback,
    }
}

fn resolver(provider: &Arc<ScriptedProvider>, models: &[&str]) -> FallbackResolver {
    let client: Arc<dyn ProviderClient> = provider.clone();
    FallbackResolver::new(
        "scripted",
        Some(client),
        settings(models, FallbackStyle::Categorized),
    )
}

fn history(latest: &str) -> Vec<Message> {
    vec![
        Message::user("hey"),
        Message::assistant("Hi there! How are you?"),
        Message::user(latest),
    ]
}

#[tokio::test]
async fn test_no_credential_uses_fallback_without_calls() {
    let resolver = FallbackResolver::new(
        "scripted",
        None,
        settings(&["a", "b"], FallbackStyle::Categorized),
    );

    let reply = resolver.resolve(&history("I feel so anxious")).await;

    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(reply.error.is_none());
    assert!(responses(Category::Anxiety).contains(&reply.response.as_str()));
}

#[tokio::test]
async fn test_flat_fallback_ignores_category() {
    let resolver = FallbackResolver::new("scripted", None, settings(&["a"], FallbackStyle::Flat));
    let reply = resolver.resolve(&history("hello")).await;

    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(flat_responses().contains(&reply.response.as_str()));
}

#[tokio::test]
async fn test_later_model_success_is_returned_verbatim() {
    let provider = ScriptedProvider::new(vec![
        ("first", Outcome::Fail(ResolveError::provider(Some(500), "boom"))),
        ("second", Outcome::Fail(ResolveError::transport("connection refused"))),
        ("third", Outcome::Text("It sounds like a heavy week.")),
    ]);

    let reply = resolver(&provider, &["first", "second", "third"])
        .resolve(&history("Work is too much"))
        .await;

    assert_eq!(reply.source, ReplySource::Provider);
    assert_eq!(reply.response, "It sounds like a heavy week.");
    assert!(reply.error.is_none());
    assert_eq!(provider.models_called(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_success_stops_iteration() {
    let provider = ScriptedProvider::new(vec![
        ("first", Outcome::Text("I'm here with you, take your time.")),
        ("second", Outcome::Text("unused second answer")),
    ]);

    let reply = resolver(&provider, &["first", "second"])
        .resolve(&history("hello"))
        .await;

    assert_eq!(reply.source, ReplySource::Provider);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_all_models_fail_uses_category_fallback_with_last_error() {
    let provider = ScriptedProvider::new(vec![
        ("first", Outcome::Fail(ResolveError::provider(Some(500), "boom"))),
        ("second", Outcome::Fail(ResolveError::provider(Some(503), "overloaded"))),
    ]);

    let reply = resolver(&provider, &["first", "second"])
        .resolve(&history("I've been so depressed lately"))
        .await;

    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(responses(Category::Depression).contains(&reply.response.as_str()));
    assert_eq!(reply.error.as_deref(), Some("Provider error: overloaded"));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_short_text_falls_back_without_trying_more_models() {
    let provider = ScriptedProvider::new(vec![
        ("first", Outcome::Text("  ok  ")),
        ("second", Outcome::Text("A perfectly long enough answer.")),
    ]);

    let reply = resolver(&provider, &["first", "second"])
        .resolve(&history("hello"))
        .await;

    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(responses(Category::Greeting).contains(&reply.response.as_str()));
    assert_eq!(reply.error.as_deref(), Some("Empty result: 2 usable characters"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_quota_error_backs_off_before_next_model() {
    let provider = ScriptedProvider::new(vec![
        ("first", Outcome::Fail(ResolveError::provider(Some(429), "Quota exceeded"))),
        ("second", Outcome::Text("Let's take this one step at a time.")),
    ]);

    let started = Instant::now();
    let reply = resolver(&provider, &["first", "second"])
        .resolve(&history("hello"))
        .await;

    assert_eq!(reply.source, ReplySource::Provider);
    assert!(started.elapsed() >= Duration::from_millis(150));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_no_backoff_after_last_model() {
    let provider = ScriptedProvider::new(vec![(
        "only",
        Outcome::Fail(ResolveError::provider(Some(429), "Quota exceeded")),
    )]);

    let started = Instant::now();
    let reply = resolver(&provider, &["only"]).resolve(&history("hello")).await;

    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(started.elapsed() < Duration::from_millis(150));
}

#[tokio::test]
async fn test_hanging_model_times_out_and_advances() {
    let provider = ScriptedProvider::new(vec![
        ("slow", Outcome::Hang),
        ("fast", Outcome::Text("Thank you for telling me that.")),
    ]);

    let started = Instant::now();
    let reply = resolver(&provider, &["slow", "fast"])
        .resolve(&history("hello"))
        .await;

    assert_eq!(reply.source, ReplySource::Provider);
    assert_eq!(reply.response, "Thank you for telling me that.");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_panicking_provider_becomes_error_reply() {
    let provider = ScriptedProvider::new(vec![("first", Outcome::Panic)]);

    let reply = resolver(&provider, &["first"]).resolve(&history("hello")).await;

    assert_eq!(reply.source, ReplySource::Error);
    assert_eq!(reply.error.as_deref(), Some("provider exploded"));
    assert!(!reply.response.is_empty());
}

#[tokio::test]
async fn test_empty_model_list_falls_back() {
    let provider = ScriptedProvider::new(vec![]);
    let reply = resolver(&provider, &[]).resolve(&[]).await;

    assert_eq!(reply.source, ReplySource::Fallback);
    assert!(responses(Category::Default).contains(&reply.response.as_str()));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_repeated_calls_are_consistent() {
    let provider = ScriptedProvider::new(vec![(
        "first",
        Outcome::Text("Breathing slowly can help a lot."),
    )]);
    let resolver = resolver(&provider, &["first"]);

    let first = resolver.resolve(&history("I'm nervous")).await;
    let second = resolver.resolve(&history("I'm nervous")).await;

    assert_eq!(first, second);
}
