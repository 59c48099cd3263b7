//! One scheduled run: pick topic and voice, look up news, hand off to the pipeline.

use crate::domain::{NewsItem, PublicationOutcome, Topic};
use crate::ports::{NewsQuery, NewsSearchPort, ScheduledJob};
use crate::usecases::publication_pipeline::PublicationPipeline;
use crate::usecases::topic_selector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct PostingJob {
    news: Arc<dyn NewsSearchPort>,
    pipeline: Arc<PublicationPipeline>,
    rng: Mutex<StdRng>,
}

impl PostingJob {
    pub fn new(news: Arc<dyn NewsSearchPort>, pipeline: Arc<PublicationPipeline>) -> Self {
        Self::with_rng(news, pipeline, StdRng::from_entropy())
    }

    /// Deterministic topic/voice sequence, for tests and replays.
    pub fn with_rng(
        news: Arc<dyn NewsSearchPort>,
        pipeline: Arc<PublicationPipeline>,
        rng: StdRng,
    ) -> Self {
        Self {
            news,
            pipeline,
            rng: Mutex::new(rng),
        }
    }

    /// Latest news for the topic. A failed search degrades to "no news".
    async fn fetch_news(&self, topic: Topic) -> Vec<NewsItem> {
        match self.news.search_news(&NewsQuery::latest(topic.as_str())).await {
            Ok(items) => {
                info!(topic = %topic, results = items.len(), "news fetched");
                items
            }
            Err(e) => {
                warn!(topic = %topic, error = %e, "news search failed; drafting without news");
                Vec::new()
            }
        }
    }

    pub async fn run(&self) -> PublicationOutcome {
        let (topic, voice) = match self.rng.lock() {
            Ok(mut rng) => topic_selector::select(&mut *rng),
            Err(poisoned) => topic_selector::select(&mut *poisoned.into_inner()),
        };
        info!(topic = %topic, voice = %voice, "scheduled run started");

        let news = self.fetch_news(topic).await;
        let outcome = self.pipeline.publish(topic, voice, &news).await;

        match &outcome {
            PublicationOutcome::Published { text, .. } => {
                info!(chars = text.chars().count(), "schedule complete: post published")
            }
            PublicationOutcome::PlatformRejected { status, .. } => {
                warn!(status, "schedule complete: X refused the post")
            }
            PublicationOutcome::PlatformFailed { message, .. } => {
                warn!(error = %message, "schedule complete: X could not be reached")
            }
            PublicationOutcome::GaveUp { attempts } => {
                warn!(attempts, "schedule complete: could not publish a post")
            }
        }
        outcome
    }
}

#[async_trait::async_trait]
impl ScheduledJob for PostingJob {
    async fn run_once(&self) {
        self.run().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogCategory, Platform, TOPICS};
    use crate::ports::{SafeSearch, TimeWindow};
    use crate::usecases::audit_trail::AuditTrail;
    use crate::usecases::content_generator::ContentGenerator;
    use crate::usecases::content_reviewer::ContentReviewer;
    use crate::usecases::fakes::{FakeNews, FakeSocial, MemoryAudit, ScriptedAi};
    use crate::usecases::publication_pipeline::RetryPolicy;

    fn pipeline(drafts: Arc<ScriptedAi>, audit: Arc<MemoryAudit>) -> Arc<PublicationPipeline> {
        let trail = AuditTrail::new(chrono_tz::UTC)
            .with_log(Platform::X, audit.clone())
            .with_log(Platform::Bluesky, audit);
        Arc::new(PublicationPipeline::new(
            ContentGenerator::new(drafts),
            ContentReviewer::new(Arc::new(ScriptedAi::always("Approved"))),
            Arc::new(FakeSocial::accepting(Platform::X)),
            Arc::new(FakeSocial::accepting(Platform::Bluesky)),
            Arc::new(trail),
            RetryPolicy::default(),
        ))
    }

    #[tokio::test]
    async fn test_run_queries_latest_news_for_selected_topic() {
        let news = Arc::new(FakeNews::with(vec![NewsItem {
            title: "Comet spotted".into(),
            ..Default::default()
        }]));
        let audit = Arc::new(MemoryAudit::default());
        let job = PostingJob::with_rng(
            news.clone(),
            pipeline(Arc::new(ScriptedAi::always("Look up! #Space #Comet")), audit.clone()),
            StdRng::seed_from_u64(1),
        );

        let outcome = job.run().await;

        assert!(outcome.is_published());
        let queries = news.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert!(TOPICS.contains(&queries[0].keywords.as_str()));
        assert_eq!(queries[0].region, "wt-wt");
        assert_eq!(queries[0].safesearch, SafeSearch::Off);
        assert_eq!(queries[0].time_window, TimeWindow::Day);
        assert_eq!(queries[0].max_results, 1);
        assert_eq!(audit.messages(LogCategory::Posted).len(), 2);
    }

    #[tokio::test]
    async fn test_search_failure_still_drafts() {
        let drafts = Arc::new(ScriptedAi::always("No news is good news. #Memes #Internet"));
        let job = PostingJob::with_rng(
            Arc::new(FakeNews::failing("rate limited")),
            pipeline(drafts.clone(), Arc::new(MemoryAudit::default())),
            StdRng::seed_from_u64(2),
        );

        job.run_once().await;

        assert_eq!(drafts.calls(), 1);
    }
}
