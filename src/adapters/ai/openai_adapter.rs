//! Chat-completions backend for drafting and review, selected with
//! `TOPIC_POSTER_AI_PROVIDER=openai`. Gemini stays the default.

use crate::domain::DomainError;
use crate::ports::TextGenerationPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Sends each prompt as a single user message and hands back the first choice as plain
/// text. The same instance serves the generator and the reviewer.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// `api_url` is the full chat-completions endpoint; `api_key` is `GEN_AI_KEY`.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 1.0,
        }
    }

    /// Strip a surrounding markdown code fence, which some models add around short answers.
    fn strip_fence(raw_text: &str) -> String {
        let trimmed = raw_text.trim();
        let Some(inner) = trimmed.strip_prefix("```") else {
            return trimmed.to_string();
        };
        // Drop an optional language tag on the opening fence line.
        let inner = match inner.find('\n') {
            Some(nl) if !inner[..nl].contains(' ') => &inner[nl + 1..],
            _ => inner,
        };
        inner
            .strip_suffix("```")
            .unwrap_or(inner)
            .trim()
            .to_string()
    }
}

/// Chat-completions request body.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl TextGenerationPort for OpenAiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        info!(model = %self.model, prompt_len = prompt.len(), "sending prompt to AI");

        let request = self.request(prompt);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Generator(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Generator(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Generator(format!("Failed to parse API response: {}", e)))?;

        let raw_content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DomainError::Generator("No response choices returned".to_string()))?;

        debug!(raw_len = raw_content.len(), "received AI response");
        Ok(Self::strip_fence(&raw_content))
    }
}
