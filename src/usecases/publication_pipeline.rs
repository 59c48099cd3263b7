//! Publication pipeline: draft -> review -> length check -> publish, with bounded retries.
//!
//! Per attempt:
//! 1. Draft via [`ContentGenerator`]; failures are logged to both error logs and paused on.
//! 2. Review via [`ContentReviewer`]; a rejection is logged verbatim and retried after a short pause.
//! 3. Length check; an over-long draft is logged and retried (by default without using up an attempt).
//! 4. Publish to Bluesky (no status contract), then to X where only `201` counts as success.
//!    Once Bluesky has the post, anything short of `201` from X ends the run.
//!
//! Nothing escapes this loop: exhaustion is logged and returned as [`PublicationOutcome::GaveUp`].

use crate::domain::{
    AttemptOutcome, Draft, DomainError, LogCategory, NewsItem, Platform, PublicationOutcome,
    Topic, Verdict, Voice,
};
use crate::ports::SocialPort;
use crate::shared::config::{
    AppConfig, DEFAULT_ERROR_PAUSE_SECS, DEFAULT_MAX_POST_CHARS, DEFAULT_MAX_RETRIES,
    DEFAULT_REJECTION_PAUSE_SECS,
};
use crate::usecases::audit_trail::AuditTrail;
use crate::usecases::content_generator::ContentGenerator;
use crate::usecases::content_reviewer::ContentReviewer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// The only status X answers a created post with.
pub const X_CREATED: u16 = 201;

pub const MAX_RETRIES_MESSAGE: &str = "Maximum retry attempts reached. Could not publish the post.";

/// Knobs of the retry loop. `Default` keeps the long-standing production behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Pause after a rejected or too-long draft.
    pub rejection_pause: Duration,
    /// Pause after a failed collaborator call.
    pub error_pause: Duration,
    /// Drafts longer than this many characters are never published.
    pub max_chars: usize,
    /// When false, an over-long draft loops without consuming an attempt.
    pub count_long_drafts: bool,
    /// When false, a non-201 answer or an error from X ends the run instead of retrying.
    /// Retrying re-posts to Bluesky, which already accepted the text.
    pub retry_on_platform_error: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            rejection_pause: Duration::from_secs(DEFAULT_REJECTION_PAUSE_SECS),
            error_pause: Duration::from_secs(DEFAULT_ERROR_PAUSE_SECS),
            max_chars: DEFAULT_MAX_POST_CHARS,
            count_long_drafts: false,
            retry_on_platform_error: false,
        }
    }
}

impl From<&AppConfig> for RetryPolicy {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            max_retries: cfg.max_retries_or_default(),
            rejection_pause: cfg.rejection_pause(),
            error_pause: cfg.error_pause(),
            max_chars: cfg.max_post_chars_or_default(),
            count_long_drafts: cfg.count_long_drafts(),
            retry_on_platform_error: cfg.retry_on_platform_error(),
        }
    }
}

pub struct PublicationPipeline {
    generator: ContentGenerator,
    reviewer: ContentReviewer,
    x: Arc<dyn SocialPort>,
    bluesky: Arc<dyn SocialPort>,
    audit: Arc<AuditTrail>,
    policy: RetryPolicy,
}

impl PublicationPipeline {
    pub fn new(
        generator: ContentGenerator,
        reviewer: ContentReviewer,
        x: Arc<dyn SocialPort>,
        bluesky: Arc<dyn SocialPort>,
        audit: Arc<AuditTrail>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            reviewer,
            x,
            bluesky,
            audit,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the loop until a post goes out, X refuses or fails it, or attempts run out.
    pub async fn publish(
        &self,
        topic: Topic,
        voice: Voice,
        news: &[NewsItem],
    ) -> PublicationOutcome {
        let mut attempts: u32 = 0;

        while attempts < self.policy.max_retries {
            let outcome = match self.attempt(topic, voice, news).await {
                Ok(outcome) => outcome,
                Err(e) => AttemptOutcome::Failed {
                    kind: e.kind(),
                    message: e.audit_message(),
                },
            };

            match outcome {
                AttemptOutcome::Success { text } => {
                    info!(attempts, "post published on both platforms");
                    return PublicationOutcome::Published {
                        failed_attempts: attempts,
                        text,
                    };
                }
                AttemptOutcome::Rejected => {
                    attempts += 1;
                    info!(attempts, "draft rejected by reviewer; drafting a new one");
                    self.pause_unless_exhausted(attempts, self.policy.rejection_pause)
                        .await;
                }
                AttemptOutcome::TooLong { chars } => {
                    if self.policy.count_long_drafts {
                        attempts += 1;
                    }
                    info!(
                        chars,
                        limit = self.policy.max_chars,
                        attempts,
                        "draft too long; drafting a new one"
                    );
                    self.pause_unless_exhausted(attempts, self.policy.rejection_pause)
                        .await;
                }
                AttemptOutcome::PlatformError { status } => {
                    attempts += 1;
                    warn!(status, attempts, "X did not accept the post");
                    if !self.policy.retry_on_platform_error {
                        return PublicationOutcome::PlatformRejected { status, attempts };
                    }
                    self.pause_unless_exhausted(attempts, self.policy.error_pause)
                        .await;
                }
                AttemptOutcome::PlatformFailed { message } => {
                    attempts += 1;
                    error!(attempts, error = %message, "X failed after Bluesky posted");
                    if !self.policy.retry_on_platform_error {
                        return PublicationOutcome::PlatformFailed { message, attempts };
                    }
                    self.pause_unless_exhausted(attempts, self.policy.error_pause)
                        .await;
                }
                AttemptOutcome::Failed { kind, message } => {
                    attempts += 1;
                    error!(kind, attempts, error = %message, "publication attempt failed");
                    self.audit
                        .record_both(LogCategory::Error, &message)
                        .await;
                    self.pause_unless_exhausted(attempts, self.policy.error_pause)
                        .await;
                }
            }
        }

        error!(attempts, "giving up: {}", MAX_RETRIES_MESSAGE);
        self.audit
            .record_both(LogCategory::Error, MAX_RETRIES_MESSAGE)
            .await;
        PublicationOutcome::GaveUp { attempts }
    }

    /// One generate -> review -> check -> publish pass. Errors are collaborator failures.
    async fn attempt(
        &self,
        topic: Topic,
        voice: Voice,
        news: &[NewsItem],
    ) -> Result<AttemptOutcome, DomainError> {
        let draft = self.generator.draft(topic, voice, news).await?;
        let verdict = self.reviewer.review(&draft).await?;

        if verdict == Verdict::Rejected {
            self.audit
                .record_both(LogCategory::Rejected, draft.text())
                .await;
            return Ok(AttemptOutcome::Rejected);
        }

        let chars = draft.char_len();
        if chars > self.policy.max_chars {
            self.audit.record_both(LogCategory::Long, draft.text()).await;
            return Ok(AttemptOutcome::TooLong { chars });
        }

        self.publish_draft(&draft).await
    }

    async fn publish_draft(&self, draft: &Draft) -> Result<AttemptOutcome, DomainError> {
        let text = draft.text();

        let receipt = self.bluesky.publish(text).await?;
        info!(platform = %self.bluesky.platform(), status = receipt.status, "posted");
        self.audit
            .record(Platform::Bluesky, LogCategory::Posted, text)
            .await;

        // Bluesky already has the text; an X error must not send the loop back to drafting.
        let receipt = match self.x.publish(text).await {
            Ok(receipt) => receipt,
            Err(e) => {
                let message = e.audit_message();
                self.audit
                    .record(Platform::X, LogCategory::Error, &message)
                    .await;
                return Ok(AttemptOutcome::PlatformFailed { message });
            }
        };
        if receipt.status == X_CREATED {
            info!(platform = %self.x.platform(), status = receipt.status, id = ?receipt.id, "posted");
            self.audit.record(Platform::X, LogCategory::Posted, text).await;
            Ok(AttemptOutcome::Success {
                text: text.to_string(),
            })
        } else {
            self.audit
                .record(Platform::X, LogCategory::Error, &receipt.status.to_string())
                .await;
            Ok(AttemptOutcome::PlatformError {
                status: receipt.status,
            })
        }
    }

    async fn pause_unless_exhausted(&self, attempts: u32, pause: Duration) {
        if attempts < self.policy.max_retries && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::fakes::{FakeSocial, MemoryAudit, ScriptedAi};
    use crate::usecases::setup::UnavailableSocial;
    use tokio::time::Instant;

    struct Harness {
        drafts: Arc<ScriptedAi>,
        reviews: Arc<ScriptedAi>,
        x: Arc<FakeSocial>,
        bluesky: Arc<FakeSocial>,
        x_log: Arc<MemoryAudit>,
        b_log: Arc<MemoryAudit>,
        pipeline: PublicationPipeline,
    }

    fn harness(
        drafts: ScriptedAi,
        reviews: ScriptedAi,
        x: FakeSocial,
        bluesky: FakeSocial,
        policy: RetryPolicy,
    ) -> Harness {
        let drafts = Arc::new(drafts);
        let reviews = Arc::new(reviews);
        let x = Arc::new(x);
        let bluesky = Arc::new(bluesky);
        let x_log = Arc::new(MemoryAudit::default());
        let b_log = Arc::new(MemoryAudit::default());
        let audit = Arc::new(
            AuditTrail::new(chrono_tz::America::Bogota)
                .with_log(Platform::X, x_log.clone())
                .with_log(Platform::Bluesky, b_log.clone()),
        );
        let pipeline = PublicationPipeline::new(
            ContentGenerator::new(drafts.clone()),
            ContentReviewer::new(reviews.clone()),
            x.clone(),
            bluesky.clone(),
            audit,
            policy,
        );
        Harness {
            drafts,
            reviews,
            x,
            bluesky,
            x_log,
            b_log,
            pipeline,
        }
    }

    fn topic() -> Topic {
        Topic::parse("Space Exploration").unwrap()
    }

    fn voice() -> Voice {
        Voice::parse("The Sarcastic Cynic").unwrap()
    }

    fn assert_paused_for(started: Instant, secs: u64) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
            "paused for {elapsed:?}, expected {secs}s"
        );
    }

    fn post_of(len: usize) -> String {
        let tags = " #Space #Mars";
        let mut body = "Oh great, another rocket. ".repeat(20);
        body.truncate(len - tags.len());
        format!("{body}{tags}")
    }

    #[tokio::test(start_paused = true)]
    async fn test_approved_draft_is_published_on_first_attempt() {
        let text = post_of(250);
        let h = harness(
            ScriptedAi::always(&text),
            ScriptedAi::always("Approved"),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );
        let started = Instant::now();

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(
            outcome,
            PublicationOutcome::Published {
                failed_attempts: 0,
                text: text.clone()
            }
        );
        assert_eq!(h.bluesky.posts(), vec![text.clone()]);
        assert_eq!(h.x.posts(), vec![text.clone()]);
        assert_eq!(h.b_log.messages(LogCategory::Posted), vec![text.clone()]);
        assert_eq!(h.x_log.messages(LogCategory::Posted), vec![text]);
        assert!(h.x_log.messages(LogCategory::Error).is_empty());
        assert_eq!(h.drafts.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_draft_is_logged_verbatim_and_redrafted() {
        let placeholder = "Big news from [company] today! #Tech #Innovation";
        let good = "Rockets. Again. Wake me up when they land on Mars. #Space #SpaceX";
        let h = harness(
            ScriptedAi::new(vec![Ok(placeholder)], Ok(good)),
            ScriptedAi::new(vec![Ok("Rejected")], Ok("Approved")),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );
        let started = Instant::now();

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert!(outcome.is_published());
        assert_eq!(h.x_log.messages(LogCategory::Rejected), vec![placeholder]);
        assert_eq!(h.b_log.messages(LogCategory::Rejected), vec![placeholder]);
        assert!(!h.x.posts().iter().any(|p| p == placeholder));
        assert_eq!(h.x.posts(), vec![good.to_string()]);
        assert_eq!(h.drafts.calls(), 2);
        assert_eq!(h.reviews.calls(), 2);
        assert_paused_for(started, 30);
        assert_eq!(
            outcome,
            PublicationOutcome::Published {
                failed_attempts: 1,
                text: good.to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_and_long_logs_hold_the_trimmed_draft() {
        let long = post_of(300);
        let padded_long = format!("{long}\n\n");
        let h = harness(
            ScriptedAi::new(
                vec![Ok("  Meh. #Space #Mars\n"), Ok(padded_long.as_str())],
                Err("script exhausted"),
            ),
            ScriptedAi::new(vec![Ok("Rejected")], Ok("Approved")),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy {
                max_chars: 299,
                max_retries: 2,
                ..RetryPolicy::default()
            },
        );

        h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(h.x_log.messages(LogCategory::Rejected), vec!["Meh. #Space #Mars"]);
        // 300 characters once trimmed, so over a 299 limit but not counting the newlines.
        assert_eq!(h.x_log.messages(LogCategory::Long), vec![long]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_drafts_do_not_consume_attempts() {
        let long = post_of(301);
        let ok = post_of(300);
        let mut script: Vec<Result<&str, &str>> = vec![Ok(long.as_str()); 6];
        script.push(Ok(ok.as_str()));
        let h = harness(
            ScriptedAi::new(script, Err("script exhausted")),
            ScriptedAi::always("Approved"),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );
        let started = Instant::now();

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        // Six long drafts with max_retries = 5 still end in a post.
        assert_eq!(
            outcome,
            PublicationOutcome::Published {
                failed_attempts: 0,
                text: ok.clone()
            }
        );
        assert_eq!(h.x_log.messages(LogCategory::Long).len(), 6);
        assert_eq!(h.b_log.messages(LogCategory::Long).len(), 6);
        assert!(h.x.posts().iter().all(|p| p.chars().count() <= 300));
        assert_paused_for(started, 6 * 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_drafts_can_be_counted() {
        let long = post_of(301);
        let h = harness(
            ScriptedAi::always(&long),
            ScriptedAi::always("Approved"),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy {
                count_long_drafts: true,
                ..RetryPolicy::default()
            },
        );

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(outcome, PublicationOutcome::GaveUp { attempts: 5 });
        assert_eq!(h.x_log.messages(LogCategory::Long).len(), 5);
        assert!(h.x.posts().is_empty());
        assert!(h.bluesky.posts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_201_from_x_logs_status_and_stops() {
        let text = "Mars by 2030? Sure, and I'm the Queen of England. #Space #Mars";
        let h = harness(
            ScriptedAi::always(text),
            ScriptedAi::always("Approved"),
            FakeSocial::new(Platform::X, vec![Ok(403)], 201),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(
            outcome,
            PublicationOutcome::PlatformRejected {
                status: 403,
                attempts: 1
            }
        );
        assert_eq!(h.x_log.messages(LogCategory::Error), vec!["403"]);
        assert!(h.x_log.messages(LogCategory::Posted).is_empty());
        assert_eq!(h.b_log.messages(LogCategory::Posted), vec![text]);
        assert!(h.b_log.messages(LogCategory::Error).is_empty());
        assert_eq!(h.drafts.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_201_can_be_retried() {
        let text = "Space is hard. Twitter is harder. #Space #Tech";
        let h = harness(
            ScriptedAi::always(text),
            ScriptedAi::always("Approved"),
            FakeSocial::new(Platform::X, vec![Ok(503)], 201),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy {
                retry_on_platform_error: true,
                ..RetryPolicy::default()
            },
        );

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert!(outcome.is_published());
        assert_eq!(h.x_log.messages(LogCategory::Error), vec!["503"]);
        // Bluesky took the text on both attempts.
        assert_eq!(h.bluesky.posts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_x_does_not_repost_to_bluesky() {
        let text = "Another launch, another delay. #Space #Rockets";
        let drafts = Arc::new(ScriptedAi::always(text));
        let bluesky = Arc::new(FakeSocial::accepting(Platform::Bluesky));
        let x_log = Arc::new(MemoryAudit::default());
        let b_log = Arc::new(MemoryAudit::default());
        let audit = Arc::new(
            AuditTrail::new(chrono_tz::America::Bogota)
                .with_log(Platform::X, x_log.clone())
                .with_log(Platform::Bluesky, b_log.clone()),
        );
        let pipeline = PublicationPipeline::new(
            ContentGenerator::new(drafts.clone()),
            ContentReviewer::new(Arc::new(ScriptedAi::always("Approved"))),
            Arc::new(UnavailableSocial::new(Platform::X, "CONSUMER_KEY not set")),
            bluesky.clone(),
            audit,
            RetryPolicy::default(),
        );
        let started = Instant::now();

        let outcome = pipeline.publish(topic(), voice(), &[]).await;

        let message = "SetupError - x is unavailable: CONSUMER_KEY not set".to_string();
        assert_eq!(
            outcome,
            PublicationOutcome::PlatformFailed {
                message: message.clone(),
                attempts: 1
            }
        );
        assert_eq!(bluesky.posts(), vec![text.to_string()]);
        assert_eq!(b_log.messages(LogCategory::Posted), vec![text]);
        assert!(b_log.messages(LogCategory::Error).is_empty());
        assert_eq!(x_log.messages(LogCategory::Error), vec![message]);
        assert_eq!(drafts.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_x_transport_error_stops_after_one_bluesky_post() {
        let text = "Rockets are just expensive fireworks. #Space #Tech";
        let h = harness(
            ScriptedAi::always(text),
            ScriptedAi::always("Approved"),
            FakeSocial::new(Platform::X, vec![Err("connection reset")], 201),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert!(matches!(
            outcome,
            PublicationOutcome::PlatformFailed { attempts: 1, .. }
        ));
        assert_eq!(h.bluesky.posts().len(), 1);
        let errors = h.x_log.messages(LogCategory::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("PlatformPublishFailure - "));
        assert!(h.x.posts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reviewer_failure_is_logged_and_paused_on() {
        let text = "Asteroid mining: finally a gold rush I can ignore from home. #Space #Mining";
        let h = harness(
            ScriptedAi::always(text),
            ScriptedAi::new(vec![Err("quota exceeded")], Ok("Approved")),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );
        let started = Instant::now();

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(
            outcome,
            PublicationOutcome::Published {
                failed_attempts: 1,
                text: text.to_string()
            }
        );
        for log in [&h.x_log, &h.b_log] {
            let errors = log.messages(LogCategory::Error);
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("ReviewerFailure - "));
            assert!(errors[0].contains("quota exceeded"));
            assert!(log.messages(LogCategory::Rejected).is_empty());
        }
        assert_eq!(h.drafts.calls(), 2);
        assert_eq!(h.reviews.calls(), 2);
        assert_paused_for(started, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_failures_exhaust_retries_without_raising() {
        let h = harness(
            ScriptedAi::new(Vec::new(), Err("HTTP request failed: connection reset")),
            ScriptedAi::always("Approved"),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );
        let started = Instant::now();

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(outcome, PublicationOutcome::GaveUp { attempts: 5 });
        for log in [&h.x_log, &h.b_log] {
            let errors = log.messages(LogCategory::Error);
            assert_eq!(errors.len(), 6);
            assert!(errors[0].starts_with("GeneratorFailure - "));
            assert!(errors[0].contains("connection reset"));
            assert_eq!(errors[5], MAX_RETRIES_MESSAGE);
        }
        assert_eq!(h.reviews.calls(), 0);
        // Pauses between attempts only, none after the last one.
        assert_paused_for(started, 4 * 600);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejections_exhaust_retries() {
        let h = harness(
            ScriptedAi::always("Just another day, another [product name] #Meh"),
            ScriptedAi::always("rejected"),
            FakeSocial::accepting(Platform::X),
            FakeSocial::accepting(Platform::Bluesky),
            RetryPolicy::default(),
        );

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(outcome, PublicationOutcome::GaveUp { attempts: 5 });
        assert_eq!(h.x_log.messages(LogCategory::Rejected).len(), 5);
        assert_eq!(h.b_log.messages(LogCategory::Rejected).len(), 5);
        assert_eq!(
            h.x_log.messages(LogCategory::Error),
            vec![MAX_RETRIES_MESSAGE]
        );
        assert!(h.x.posts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bluesky_failure_is_an_attempt_error() {
        let text = "Launch day vibes. #Space #Rockets";
        let h = harness(
            ScriptedAi::always(text),
            ScriptedAi::always("Approved"),
            FakeSocial::accepting(Platform::X),
            FakeSocial::new(Platform::Bluesky, vec![Err("session expired")], 200),
            RetryPolicy::default(),
        );

        let outcome = h.pipeline.publish(topic(), voice(), &[]).await;

        assert_eq!(
            outcome,
            PublicationOutcome::Published {
                failed_attempts: 1,
                text: text.to_string()
            }
        );
        let errors = h.b_log.messages(LogCategory::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("PlatformPublishFailure - "));
        assert_eq!(h.x.posts().len(), 1);
    }

    #[test]
    fn test_policy_from_config() {
        let cfg = AppConfig {
            max_retries: Some(3),
            error_pause_secs: Some(5),
            count_long_drafts: Some(true),
            ..Default::default()
        };
        let policy = RetryPolicy::from(&cfg);
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.error_pause, Duration::from_secs(5));
        assert_eq!(policy.rejection_pause, Duration::from_secs(30));
        assert_eq!(policy.max_chars, 300);
        assert!(policy.count_long_drafts);
        assert!(!policy.retry_on_platform_error);
    }
}
