//! Fans audit entries out to the per-platform logs.
//!
//! Append failures are reported through tracing and swallowed: a broken log store
//! degrades the audit record but never aborts a run.

use crate::domain::{AuditEntry, LogCategory, Platform};
use crate::ports::AuditLogPort;
use chrono::Utc;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

pub struct AuditTrail {
    logs: HashMap<Platform, Arc<dyn AuditLogPort>>,
    timezone: Tz,
}

impl AuditTrail {
    pub fn new(timezone: Tz) -> Self {
        Self {
            logs: HashMap::new(),
            timezone,
        }
    }

    pub fn with_log(mut self, platform: Platform, log: Arc<dyn AuditLogPort>) -> Self {
        self.logs.insert(platform, log);
        self
    }

    /// Current wall-clock time in the configured zone, as an audit entry.
    fn entry(&self, message: &str) -> AuditEntry {
        AuditEntry::at(&Utc::now().with_timezone(&self.timezone), message)
    }

    pub async fn record(&self, platform: Platform, category: LogCategory, message: &str) {
        let Some(log) = self.logs.get(&platform) else {
            warn!(%platform, %category, "no audit log configured; entry dropped");
            return;
        };
        let entry = self.entry(message);
        if let Err(e) = log.append(category, &entry).await {
            warn!(%platform, %category, error = %e, "audit append failed");
        }
    }

    /// Same entry to both platforms' logs of `category`, X first.
    pub async fn record_both(&self, category: LogCategory, message: &str) {
        for platform in Platform::ALL {
            self.record(platform, category, message).await;
        }
    }
}
