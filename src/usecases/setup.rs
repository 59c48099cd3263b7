//! Startup phase: collect collaborators, report how each one came up, assemble the
//! application context the scheduler runs against.
//!
//! Every collaborator yields a [`SetupStatus`]. Under [`StartupPolicy::FailOpen`] a failed
//! collaborator is replaced by its fallback and startup continues; under
//! [`StartupPolicy::FailClosed`] the first failure aborts.

use crate::domain::{DomainError, Platform, PostReceipt};
use crate::ports::{AuditLogPort, NewsSearchPort, SocialPort, TextGenerationPort};
use crate::shared::config::{AppConfig, StartupPolicy};
use crate::usecases::audit_trail::AuditTrail;
use crate::usecases::content_generator::ContentGenerator;
use crate::usecases::content_reviewer::ContentReviewer;
use crate::usecases::posting_job::PostingJob;
use crate::usecases::publication_pipeline::{PublicationPipeline, RetryPolicy, X_CREATED};
use crate::usecases::scheduler::Scheduler;
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupStatus {
    Ready,
    /// Running on a substitute (mock AI, local audit files, unavailable platform).
    Degraded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupItem {
    pub component: String,
    pub status: SetupStatus,
}

/// Per-collaborator outcome of startup.
#[derive(Debug, Default, Clone)]
pub struct SetupReport {
    items: Vec<SetupItem>,
}

impl SetupReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, component: impl Into<String>, status: SetupStatus) {
        let component = component.into();
        match &status {
            SetupStatus::Ready => info!(component = %component, "ready"),
            SetupStatus::Degraded(why) => warn!(component = %component, reason = %why, "degraded"),
            SetupStatus::Failed(why) => error!(component = %component, reason = %why, "failed"),
        }
        self.items.push(SetupItem { component, status });
    }

    pub fn items(&self) -> &[SetupItem] {
        &self.items
    }

    pub fn status_of(&self, component: &str) -> Option<&SetupStatus> {
        self.items
            .iter()
            .find(|i| i.component == component)
            .map(|i| &i.status)
    }

    pub fn is_fully_ready(&self) -> bool {
        self.items.iter().all(|i| i.status == SetupStatus::Ready)
    }

    /// Apply `policy` to one collaborator's setup result.
    ///
    /// `Ok` is recorded as ready. An error is recorded and either replaced by
    /// `fallback` (fail-open) or returned (fail-closed).
    pub fn admit<T>(
        &mut self,
        policy: StartupPolicy,
        component: &str,
        result: Result<T, DomainError>,
        fallback: impl FnOnce(&DomainError) -> T,
    ) -> Result<T, DomainError> {
        match result {
            Ok(value) => {
                self.record(component, SetupStatus::Ready);
                Ok(value)
            }
            Err(e) => match policy {
                StartupPolicy::FailOpen => {
                    let value = fallback(&e);
                    self.record(component, SetupStatus::Degraded(e.audit_message()));
                    Ok(value)
                }
                StartupPolicy::FailClosed => {
                    self.record(component, SetupStatus::Failed(e.audit_message()));
                    Err(e)
                }
            },
        }
    }
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match &item.status {
                SetupStatus::Ready => writeln!(f, "  [ok]   {}", item.component)?,
                SetupStatus::Degraded(why) => {
                    writeln!(f, "  [warn] {}: {}", item.component, why)?
                }
                SetupStatus::Failed(why) => writeln!(f, "  [fail] {}: {}", item.component, why)?,
            }
        }
        Ok(())
    }
}

/// Stand-in for a platform that could not be set up. Every publish fails, so the
/// pipeline logs the reason to the error logs instead of crashing.
pub struct UnavailableSocial {
    platform: Platform,
    reason: String,
}

impl UnavailableSocial {
    pub fn new(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            platform,
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl SocialPort for UnavailableSocial {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, _text: &str) -> Result<PostReceipt, DomainError> {
        Err(DomainError::Setup(format!(
            "{} is unavailable: {}",
            self.platform, self.reason
        )))
    }
}

/// Logs instead of posting. Wired in for both platforms while the generator is mocked,
/// so canned drafts never reach the live accounts.
pub struct DryRunSocial {
    platform: Platform,
}

impl DryRunSocial {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait::async_trait]
impl SocialPort for DryRunSocial {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, text: &str) -> Result<PostReceipt, DomainError> {
        info!(platform = %self.platform, chars = text.chars().count(), text, "dry run; not posted");
        Ok(PostReceipt {
            status: X_CREATED,
            id: None,
        })
    }
}

/// Connected collaborators, as produced by the binary's wiring.
pub struct Collaborators {
    pub news: Arc<dyn NewsSearchPort>,
    pub ai: Arc<dyn TextGenerationPort>,
    pub x: Arc<dyn SocialPort>,
    pub bluesky: Arc<dyn SocialPort>,
    pub x_log: Arc<dyn AuditLogPort>,
    pub bluesky_log: Arc<dyn AuditLogPort>,
}

pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| DomainError::Config(format!("unknown timezone {:?}: {}", name, e)))
}

/// Everything a scheduled run needs, built once at startup and shared by reference.
pub struct AppContext {
    pub timezone: Tz,
    pub audit: Arc<AuditTrail>,
    pub pipeline: Arc<PublicationPipeline>,
    pub job: Arc<PostingJob>,
}

impl AppContext {
    pub fn assemble(cfg: &AppConfig, c: Collaborators) -> Result<Self, DomainError> {
        let timezone = parse_timezone(&cfg.timezone_or_default())?;
        let audit = Arc::new(
            AuditTrail::new(timezone)
                .with_log(Platform::X, c.x_log)
                .with_log(Platform::Bluesky, c.bluesky_log),
        );
        let policy = RetryPolicy::from(cfg);
        info!(
            max_retries = policy.max_retries,
            max_chars = policy.max_chars,
            count_long_drafts = policy.count_long_drafts,
            retry_on_platform_error = policy.retry_on_platform_error,
            "retry policy"
        );
        let pipeline = Arc::new(PublicationPipeline::new(
            ContentGenerator::new(Arc::clone(&c.ai)),
            ContentReviewer::new(c.ai),
            c.x,
            c.bluesky,
            Arc::clone(&audit),
            policy,
        ));
        let job = Arc::new(PostingJob::new(c.news, Arc::clone(&pipeline)));
        Ok(Self {
            timezone,
            audit,
            pipeline,
            job,
        })
    }

    pub fn scheduler(&self, cfg: &AppConfig) -> Scheduler {
        Scheduler::new(self.job.clone(), cfg.interval(), self.timezone)
            .run_on_start(cfg.run_on_start())
    }
}
