//! Scheduler (daemon) use case: fire the job at a fixed interval, forever.
//!
//! The job is awaited inline, so two runs never overlap. Runs stay on a fixed grid from
//! the first deadline; grid points missed while a run is still busy are skipped rather
//! than bunched up.

use crate::ports::ScheduledJob;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

pub struct Scheduler {
    job: Arc<dyn ScheduledJob>,
    interval: Duration,
    timezone: Tz,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(job: Arc<dyn ScheduledJob>, interval: Duration, timezone: Tz) -> Self {
        Self {
            job,
            interval,
            timezone,
            run_on_start: false,
        }
    }

    /// Fire once right away instead of waiting a full interval first.
    pub fn run_on_start(mut self, yes: bool) -> Self {
        self.run_on_start = yes;
        self
    }

    /// `at` rendered in the scheduler's zone.
    pub fn format_label(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
    }

    fn wall_clock(deadline: Instant) -> DateTime<Utc> {
        let ahead = deadline.saturating_duration_since(Instant::now());
        Utc::now() + chrono::Duration::from_std(ahead).unwrap_or_else(|_| chrono::Duration::zero())
    }

    /// Run at most `max_runs` jobs (`None` = forever).
    pub async fn run(&self, max_runs: Option<u64>) {
        let mut deadline = if self.run_on_start {
            Instant::now()
        } else {
            Instant::now() + self.interval
        };

        let first_at = if self.run_on_start {
            "now".to_string()
        } else {
            self.format_label(Self::wall_clock(deadline))
        };
        info!(
            interval_secs = self.interval.as_secs(),
            timezone = %self.timezone,
            "scheduler started; first post at {}", first_at
        );

        let mut runs: u64 = 0;
        while !max_runs.is_some_and(|max| runs >= max) {
            tokio::time::sleep_until(deadline).await;
            self.job.run_once().await;
            runs += 1;
            deadline = next_deadline(deadline, Instant::now(), self.interval);
            info!(
                runs,
                "next post will be sent at {}",
                self.format_label(Self::wall_clock(deadline))
            );
        }
    }

    pub async fn run_forever(&self) {
        self.run(None).await
    }
}

/// The tick after `previous` on its fixed grid. Grid points that passed while a run was
/// still busy are skipped, not caught up on.
fn next_deadline(previous: Instant, now: Instant, period: Duration) -> Instant {
    let next = previous + period;
    if next >= now || period.is_zero() {
        return next;
    }
    let behind = (now - next).as_nanos() % period.as_nanos();
    if behind == 0 {
        return now;
    }
    now + period - Duration::from_nanos(behind as u64)
}
