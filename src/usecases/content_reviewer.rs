//! Second model call that approves or rejects a draft.
//!
//! Default-to-accept: only an exact "rejected" answer rejects (see [`Verdict::from_review`]).

use crate::domain::{Draft, DomainError, Verdict};
use crate::ports::TextGenerationPort;
use std::sync::Arc;
use tracing::info;

/// Labelled few-shot examples shown to the reviewer: (post, evaluation).
const EXAMPLES: &[(&str, &str)] = &[
    (
        "Laughter is the best medicine, and memes are the sugar that makes it go down! 😂 Keep sharing the humor, folks!  #SpreadTheJoy #MemesForLife #FunnyContent #LaughterIsTheBestMedicine",
        "Approved",
    ),
    (
        "The [insert industry] industry is at it again! 😅 Just when I thought I'd seen it all, they pull something like this. What's next?!  #NeverADullMoment #IndustryWatch #OnlyInThe[Industry] #GottaLoveIt",
        "Rejected",
    ),
    (
        "Just finished reading a fantastic book about the future of AI! 🤔 It's mind-blowing stuff! Who else is fascinated by this topic? #AI #FutureTech #BookRecommendations",
        "Approved",
    ),
    (
        "As a techie guru, I gotta say, those new headphones are a game changer! 🎧 I was so focused listening to music, I barely noticed I was at work, ahahah! #TechGuru #MusicLover #NewHeadphones #ProductReview",
        "Approved",
    ),
    (
        "Just another day, another [product name] doing [function] 🙄 #Boring #DailyLife #Meh",
        "Rejected",
    ),
    (
        "OMG, this new [insert tech] is insane! 🤯 It's like we're living in the future. #Tech #Future #Innovation #Whoa",
        "Rejected",
    ),
    (
        "Okay, here's my attempt:\nRegenerative Flea Market in LA? Sounds lovely, but how do we make *every* market regenerative? Small steps, I guess. Building community is key. Let's lift each other up while lifting up the planet. ❤️ #ClimateAction #Sustainability #CommunityWellness #LAClimateWeek",
        "Rejected",
    ),
];

pub struct ContentReviewer {
    ai: Arc<dyn TextGenerationPort>,
}

impl ContentReviewer {
    pub fn new(ai: Arc<dyn TextGenerationPort>) -> Self {
        Self { ai }
    }

    pub async fn review(&self, draft: &Draft) -> Result<Verdict, DomainError> {
        let raw = self
            .ai
            .generate(&Self::prompt(draft))
            .await
            .map_err(|e| match e {
                DomainError::Generator(msg) => DomainError::Reviewer(msg),
                other => DomainError::Reviewer(other.to_string()),
            })?;
        let verdict = Verdict::from_review(&raw);
        info!(review = %raw.trim(), ?verdict, "draft reviewed");
        Ok(verdict)
    }

    /// Rubric plus labelled examples, ending with the draft under review.
    pub fn prompt(draft: &Draft) -> String {
        let mut prompt = String::from(
            "You review social media posts and decide whether they are fit to publish. Judge each post on:\n\n\
             1. **Engagement and structure:** Is it well structured, interesting, and likely to engage a real audience? Does it read like something a real person would post, in natural conversational language rather than formal or robotic prose?\n\
             2. **Authenticity:** Does it sound human rather than generated? Is the voice consistent with the persona?\n\
             3. **Content:** Does it actually address its theme?\n\
             4. **No placeholders:** Reject anything containing unfilled template placeholders such as [], [enterprise], [company].\n\
             5. **No preamble:** Reject anything with text before the post itself (e.g. \"Here's my attempt:\").\n\n\
             Answer ONLY with 'Approved' or 'Rejected'.\n\nExamples:\n",
        );
        for (post, evaluation) in EXAMPLES {
            prompt.push_str(&format!("\nPost: {}\nEvaluation: {}\n", post, evaluation));
        }
        prompt.push_str(&format!("\nThe post to evaluate is: {}", draft.text()));
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl TextGenerationPort for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait::async_trait]
    impl TextGenerationPort for Broken {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Err(DomainError::Generator("503 Service Unavailable".into()))
        }
    }

    #[test]
    fn test_prompt_contains_examples_and_draft() {
        let prompt = ContentReviewer::prompt(&Draft::new("Check out [company] today! #Deals"));
        assert_eq!(prompt.matches("Evaluation: Approved").count(), 3);
        assert_eq!(prompt.matches("Evaluation: Rejected").count(), 4);
        assert!(prompt.ends_with("The post to evaluate is: Check out [company] today! #Deals"));
    }

    #[tokio::test]
    async fn test_review_is_default_accept() {
        let draft = Draft::new("A post");
        for (reply, expected) in [
            ("Rejected", Verdict::Rejected),
            ("rejected\n", Verdict::Rejected),
            ("Approved", Verdict::Approved),
            ("I think this is Rejected", Verdict::Approved),
            ("¯\\_(ツ)_/¯", Verdict::Approved),
        ] {
            let reviewer = ContentReviewer::new(Arc::new(Fixed(reply)));
            assert_eq!(reviewer.review(&draft).await.unwrap(), expected, "{reply}");
        }
    }

    #[tokio::test]
    async fn test_review_failure_is_reviewer_error() {
        let reviewer = ContentReviewer::new(Arc::new(Broken));
        let err = reviewer.review(&Draft::new("x")).await.unwrap_err();
        assert_eq!(err.kind(), "ReviewerFailure");
    }
}
