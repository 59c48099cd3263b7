//! Inbound port. The scheduler calls into the application.

/// A unit of work fired by the scheduler. Must not fail: problems are logged inside.
#[async_trait::async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run_once(&self);
}
