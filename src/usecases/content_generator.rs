//! Drafts a post for a topic and voice, optionally inspired by a news item.
//!
//! One generative call per draft. No retries here; failures propagate to the pipeline.

use crate::domain::{Draft, DomainError, NewsItem, Topic, Voice, render_news};
use crate::ports::TextGenerationPort;
use std::sync::Arc;
use tracing::debug;

/// Length the model is asked to respect. Enforcement is the pipeline's job.
pub const PROMPT_CHAR_LIMIT: usize = 280;

pub struct ContentGenerator {
    ai: Arc<dyn TextGenerationPort>,
}

impl ContentGenerator {
    pub fn new(ai: Arc<dyn TextGenerationPort>) -> Self {
        Self { ai }
    }

    pub async fn draft(
        &self,
        topic: Topic,
        voice: Voice,
        news: &[NewsItem],
    ) -> Result<Draft, DomainError> {
        let prompt = Self::prompt(topic, voice, news);
        let text = self.ai.generate(&prompt).await.map_err(|e| match e {
            e @ DomainError::Generator(_) => e,
            other => DomainError::Generator(other.to_string()),
        })?;
        let text = text.trim().to_string();
        debug!(topic = %topic, chars = text.chars().count(), "draft generated");
        Ok(Draft::new(text))
    }

    /// Structured drafting prompt: persona, theme, news hook, hashtags, length, no preamble.
    pub fn prompt(topic: Topic, voice: Voice, news: &[NewsItem]) -> String {
        format!(
            r#"**Objective:** Write ONE authentic-sounding post (maximum {limit} characters) that fits the given theme and voice, ideally sparked by the recent news item.

**Persona:** You are a seasoned social media writer who makes posts sound like they came from a real person.

**Instructions:**

1. **Read the inputs:** Review the **Theme** and the **Voice**. If a **News Article** is given, read it carefully.
2. **Become the voice:** Adopt the **Voice** completely: its vocabulary, tone, humor (or lack of it) and online habits.
3. **Stay on theme:** The post must relate directly to the **Theme**.
4. **Use the news when present:** If a **News Article** is provided, react to it the way this voice would: comment on it, give an opinion, share a related anecdote, or use it to make a broader point about the theme. Keep a clear connection to the news; no unrelated tangents. If the article is "None", write from the theme and voice alone.
5. **Sound human:** Conversational language, contractions, rhetorical questions or interjections where they fit. Never formal or robotic.
6. **Be concise and engaging:** Something people would actually stop and read.
7. **Hashtags:** Add 2-4 relevant hashtags (theme, people or entities mentioned, established tags for the topic). Relevance beats popularity.
8. **Hard length limit:** No more than {limit} characters including spaces and hashtags. Use emojis or abbreviations sparingly if they suit the voice.
9. **Output only the post.** NO preamble such as "Okay, here's my attempt:", no quotes around it, nothing after it.

**Input:**

Theme: {topic}
Voice: {voice}
News Article: {news}"#,
            limit = PROMPT_CHAR_LIMIT,
            topic = topic,
            voice = voice,
            news = render_news(news),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        prompts: Mutex<Vec<String>>,
        reply: Result<String, String>,
    }

    #[async_trait::async_trait]
    impl TextGenerationPort for Recording {
        async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(DomainError::Generator)
        }
    }

    fn topic() -> Topic {
        Topic::parse("Space Exploration").unwrap()
    }

    fn voice() -> Voice {
        Voice::parse("The Sarcastic Cynic").unwrap()
    }

    #[test]
    fn test_prompt_without_news_falls_back_to_theme() {
        let prompt = ContentGenerator::prompt(topic(), voice(), &[]);
        assert!(prompt.contains("Theme: Space Exploration"));
        assert!(prompt.contains("Voice: The Sarcastic Cynic"));
        assert!(prompt.contains("News Article: None"));
        assert!(prompt.contains("2-4 relevant hashtags"));
        assert!(prompt.contains("280 characters"));
    }

    #[test]
    fn test_prompt_embeds_news() {
        let news = NewsItem {
            title: "Starship flies again".into(),
            body: "Fifth test flight".into(),
            ..Default::default()
        };
        let prompt = ContentGenerator::prompt(topic(), voice(), &[news]);
        assert!(prompt.contains("News Article: Starship flies again - Fifth test flight"));
    }

    #[tokio::test]
    async fn test_draft_trims_model_output() {
        let ai = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
            reply: Ok("  Rockets again? Sure. #Space #SpaceX \n".into()),
        });
        let generator = ContentGenerator::new(ai.clone());
        let draft = generator.draft(topic(), voice(), &[]).await.unwrap();
        assert_eq!(draft.text(), "Rockets again? Sure. #Space #SpaceX");
        assert_eq!(ai.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_draft_propagates_failure() {
        let ai = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
            reply: Err("quota exceeded".into()),
        });
        let err = ContentGenerator::new(ai)
            .draft(topic(), voice(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "GeneratorFailure");
    }
}
