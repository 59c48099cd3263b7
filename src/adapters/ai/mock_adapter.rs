//! Mock AI adapter for dry runs without API calls.
//!
//! Returns canned drafts for drafting prompts. Any other prompt (the reviewer's) gets
//! "Approved", which exercises the full publish path.

use crate::domain::DomainError;
use crate::ports::TextGenerationPort;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

const CANNED_DRAFTS: &[&str] = &[
    "[MOCK] Another day, another headline promising the future by Friday. I'll believe it when it ships. #TechNews #Skeptic",
    "[MOCK] Read the news, made coffee, still processing. Anyone else feel like the world speedruns every Monday? #MondayMood #News",
    "[MOCK] Small wins count too. Saw something hopeful in today's news and I'm holding onto it. #GoodNews #Optimism",
];

/// Marker that only the drafting prompt contains.
const DRAFT_PROMPT_MARKER: &str = "Theme:";

/// Mock text generator.
///
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    next: AtomicUsize,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self::with_delay(100)
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            next: AtomicUsize::new(0),
        }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TextGenerationPort for MockAiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        info!(prompt_len = prompt.len(), "[MOCK] Simulating text generation");

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        if prompt.contains(DRAFT_PROMPT_MARKER) {
            let i = self.next.fetch_add(1, Ordering::Relaxed) % CANNED_DRAFTS.len();
            Ok(CANNED_DRAFTS[i].to_string())
        } else {
            Ok("Approved".to_string())
        }
    }
}
