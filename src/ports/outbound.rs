//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{AuditEntry, DomainError, LogCategory, NewsItem, Platform, PostReceipt};

/// Safe-search level understood by the news collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeSearch {
    On,
    Moderate,
    Off,
}

/// How far back a news search looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
}

/// Parameters of a news search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub keywords: String,
    pub region: String,
    pub safesearch: SafeSearch,
    pub time_window: TimeWindow,
    pub max_results: usize,
}

impl NewsQuery {
    /// Most recent single item for `keywords`: worldwide, unfiltered, past day.
    pub fn latest(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            region: "wt-wt".to_string(),
            safesearch: SafeSearch::Off,
            time_window: TimeWindow::Day,
            max_results: 1,
        }
    }
}

/// News search collaborator.
#[async_trait::async_trait]
pub trait NewsSearchPort: Send + Sync {
    /// Returns at most `query.max_results` items. Zero results is `Ok(vec![])`, not an error.
    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, DomainError>;
}

/// Generative-text collaborator. One prompt in, free text out.
#[async_trait::async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;
}

/// Social platform that accepts text posts.
#[async_trait::async_trait]
pub trait SocialPort: Send + Sync {
    fn platform(&self) -> Platform;

    /// Publish `text`. Transport failures are errors; an HTTP answer of any status is
    /// returned in the receipt so the caller can apply its own success rule.
    async fn publish(&self, text: &str) -> Result<PostReceipt, DomainError>;
}

/// Append-only audit store for one platform.
#[async_trait::async_trait]
pub trait AuditLogPort: Send + Sync {
    async fn append(&self, category: LogCategory, entry: &AuditEntry) -> Result<(), DomainError>;
}
