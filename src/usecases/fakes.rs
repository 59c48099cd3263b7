//! In-memory port doubles for use-case tests.

use crate::domain::{AuditEntry, DomainError, LogCategory, NewsItem, Platform, PostReceipt};
use crate::ports::{AuditLogPort, NewsQuery, NewsSearchPort, SocialPort, TextGenerationPort};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replies from a script; once it runs dry the fallback repeats.
pub struct ScriptedAi {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    pub calls: Mutex<u32>,
}

impl ScriptedAi {
    pub fn new(script: Vec<Result<&str, &str>>, fallback: Result<&str, &str>) -> Self {
        let own = |r: Result<&str, &str>| r.map(str::to_string).map_err(str::to_string);
        Self {
            script: Mutex::new(script.into_iter().map(own).collect()),
            fallback: own(fallback),
            calls: Mutex::new(0),
        }
    }

    pub fn always(reply: &str) -> Self {
        Self::new(Vec::new(), Ok(reply))
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl TextGenerationPort for ScriptedAi {
    async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
        *self.calls.lock().unwrap() += 1;
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
            .map_err(DomainError::Generator)
    }
}

/// Records every published text; answers with scripted statuses (or transport errors).
pub struct FakeSocial {
    platform: Platform,
    script: Mutex<VecDeque<Result<u16, String>>>,
    fallback: u16,
    pub posts: Mutex<Vec<String>>,
}

impl FakeSocial {
    pub fn new(platform: Platform, script: Vec<Result<u16, &str>>, fallback: u16) -> Self {
        Self {
            platform,
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map_err(str::to_string))
                    .collect(),
            ),
            fallback,
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(platform: Platform) -> Self {
        let status = match platform {
            Platform::X => 201,
            Platform::Bluesky => 200,
        };
        Self::new(platform, Vec::new(), status)
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SocialPort for FakeSocial {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn publish(&self, text: &str) -> Result<PostReceipt, DomainError> {
        let next = self.script.lock().unwrap().pop_front();
        let status = next.unwrap_or(Ok(self.fallback)).map_err(DomainError::Platform)?;
        self.posts.lock().unwrap().push(text.to_string());
        Ok(PostReceipt { status, id: None })
    }
}

/// Audit log that keeps rows in memory.
#[derive(Default)]
pub struct MemoryAudit {
    pub rows: Mutex<Vec<(LogCategory, AuditEntry)>>,
}

impl MemoryAudit {
    pub fn messages(&self, category: LogCategory) -> Vec<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, e)| e.message.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl AuditLogPort for MemoryAudit {
    async fn append(&self, category: LogCategory, entry: &AuditEntry) -> Result<(), DomainError> {
        self.rows.lock().unwrap().push((category, entry.clone()));
        Ok(())
    }
}

/// News search returning a fixed result set, or failing.
pub struct FakeNews {
    pub result: Result<Vec<NewsItem>, String>,
    pub queries: Mutex<Vec<NewsQuery>>,
}

impl FakeNews {
    pub fn with(items: Vec<NewsItem>) -> Self {
        Self {
            result: Ok(items),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl NewsSearchPort for FakeNews {
    async fn search_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, DomainError> {
        self.queries.lock().unwrap().push(query.clone());
        self.result.clone().map_err(DomainError::Search)
    }
}
