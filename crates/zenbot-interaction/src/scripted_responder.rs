use std::time::Duration;
use tracing::debug;
use zenbot_core::fallback::pick_for;
use zenbot_core::{Message, Reply, classify, latest_content};

/// Answers from the categorized reply table without any provider.
///
/// The fixed delay keeps the chat UI's typing indicator visible.
#[derive(Debug, Clone)]
pub struct ScriptedResponder {
    delay: Duration,
}

impl ScriptedResponder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn respond(&self, history: &[Message]) -> Reply {
        let category = classify(latest_content(history));
        let text = pick_for(category, &mut rand::thread_rng());
        debug!(category = %category, "Scripted reply selected");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Reply::mock(text)
    }
}
