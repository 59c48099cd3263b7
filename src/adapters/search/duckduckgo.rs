//! DuckDuckGo news adapter. Implements NewsSearchPort.
//!
//! Two requests per search: the HTML front page yields a `vqd` token for the query,
//! then `news.js` returns JSON results for (query, token).

use crate::domain::{DomainError, NewsItem};
use crate::ports::{NewsQuery, NewsSearchPort, SafeSearch, TimeWindow};
use chrono::{DateTime, Utc};
use html2text::render::TrivialDecorator;
use serde::Deserialize;
use tracing::{debug, info};

const DDG_BASE_URL: &str = "https://duckduckgo.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct DuckDuckGoNews {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoNews {
    pub fn new() -> Self {
        Self::with_base_url(DDG_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Query token embedded in the search page, in any of its three quoting styles.
    fn extract_vqd(html: &str) -> Option<String> {
        for (open, close) in [("vqd=\"", '"'), ("vqd=", '&'), ("vqd='", '\'')] {
            if let Some(start) = html.find(open) {
                let rest = &html[start + open.len()..];
                if let Some(end) = rest.find(close) {
                    let token = &rest[..end];
                    if !token.is_empty() {
                        return Some(token.to_string());
                    }
                }
            }
        }
        None
    }

    fn safesearch_param(level: SafeSearch) -> &'static str {
        match level {
            SafeSearch::On => "1",
            SafeSearch::Moderate => "-1",
            SafeSearch::Off => "-2",
        }
    }

    fn time_param(window: TimeWindow) -> &'static str {
        match window {
            TimeWindow::Day => "d",
            TimeWindow::Week => "w",
            TimeWindow::Month => "m",
        }
    }

    async fn fetch_vqd(&self, keywords: &str) -> Result<String, DomainError> {
        let html = self
            .client
            .get(&self.base_url)
            .query(&[("q", keywords)])
            .send()
            .await
            .map_err(|e| DomainError::Search(format!("vqd request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| DomainError::Search(format!("vqd request failed: {}", e)))?
            .text()
            .await
            .map_err(|e| DomainError::Search(format!("vqd body unreadable: {}", e)))?;
        Self::extract_vqd(&html)
            .ok_or_else(|| DomainError::Search(format!("no vqd token for query {:?}", keywords)))
    }

    fn into_items(response: NewsResponse, max_results: usize) -> Vec<NewsItem> {
        response
            .results
            .into_iter()
            .filter(|r| !r.title.trim().is_empty())
            .take(max_results)
            .map(|r| NewsItem {
                title: normalize(&r.title),
                body: normalize(&r.excerpt),
                source: r.source,
                url: r.url,
                date: r
                    .date
                    .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

impl Default for DuckDuckGoNews {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsRow>,
}

#[derive(Deserialize)]
struct NewsRow {
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: String,
}

/// Wide enough that html2text never wraps a headline or excerpt.
const RENDER_WIDTH: usize = 10_000;

/// Render DuckDuckGo's HTML-flavoured snippets (bold markup, named and numeric entities)
/// as plain text on a single line.
fn normalize(raw: &str) -> String {
    let text = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(raw.as_bytes(), RENDER_WIDTH)
        .unwrap_or_else(|_| raw.to_string());
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait::async_trait]
impl NewsSearchPort for DuckDuckGoNews {
    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, DomainError> {
        let vqd = self.fetch_vqd(&query.keywords).await?;
        debug!(keywords = %query.keywords, "obtained vqd token");

        let url = format!("{}/news.js", self.base_url.trim_end_matches('/'));
        let params = [
            ("l", query.region.as_str()),
            ("o", "json"),
            ("noamp", "1"),
            ("q", query.keywords.as_str()),
            ("vqd", vqd.as_str()),
            ("p", Self::safesearch_param(query.safesearch)),
            ("df", Self::time_param(query.time_window)),
        ];
        let response: NewsResponse = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DomainError::Search(format!("news request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| DomainError::Search(format!("news request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| DomainError::Search(format!("Failed to parse news response: {}", e)))?;

        let items = Self::into_items(response, query.max_results);
        info!(keywords = %query.keywords, results = items.len(), "news search complete");
        Ok(items)
    }
}
