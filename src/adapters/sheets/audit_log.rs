//! Spreadsheet-backed audit log. Implements AuditLogPort.
//!
//! One spreadsheet per platform, one worksheet per log category.

use super::auth::{ServiceAccountAuth, ServiceAccountKey};
use super::client::{SheetsClient, spreadsheet_id};
use crate::domain::{AuditEntry, DomainError, LogCategory, Platform};
use crate::ports::AuditLogPort;
use std::sync::Arc;
use tracing::info;

/// Worksheet holding `category` entries for `platform`.
pub fn worksheet_title(platform: Platform, category: LogCategory) -> &'static str {
    match (platform, category) {
        (Platform::X, LogCategory::Posted) => "PostedTweets",
        (Platform::X, LogCategory::Long) => "LongTweets",
        (Platform::X, LogCategory::Error) => "Errors",
        (Platform::X, LogCategory::Rejected) => "TweetsRejected",
        (Platform::Bluesky, LogCategory::Posted) => "Posted",
        (Platform::Bluesky, LogCategory::Long) => "Long",
        (Platform::Bluesky, LogCategory::Error) => "Errors",
        (Platform::Bluesky, LogCategory::Rejected) => "Rejected",
    }
}

/// Worksheets `platform` expects that are absent from `titles`.
pub fn missing_worksheets(platform: Platform, titles: &[String]) -> Vec<&'static str> {
    LogCategory::ALL
        .iter()
        .map(|c| worksheet_title(platform, *c))
        .filter(|w| !titles.iter().any(|t| t == w))
        .collect()
}

pub struct SheetAuditLog {
    client: SheetsClient,
    platform: Platform,
}

impl SheetAuditLog {
    /// Authenticate, open the spreadsheet and check that all four worksheets exist.
    pub async fn connect(
        platform: Platform,
        key_json: &str,
        sheet_url: &str,
    ) -> Result<Self, DomainError> {
        let key = ServiceAccountKey::from_json_or_path(key_json).await?;
        let id = spreadsheet_id(sheet_url)?;
        let auth = Arc::new(ServiceAccountAuth::new(key));
        let client = SheetsClient::new(auth.clone(), id);

        let titles = client.worksheet_titles().await?;
        let missing = missing_worksheets(platform, &titles);
        if !missing.is_empty() {
            return Err(DomainError::Setup(format!(
                "{} spreadsheet lacks worksheets: {}",
                platform,
                missing.join(", ")
            )));
        }

        info!(
            platform = %platform,
            spreadsheet = %client.spreadsheet_id(),
            account = %auth.client_email(),
            "audit spreadsheet ready"
        );
        Ok(Self { client, platform })
    }
}

#[async_trait::async_trait]
impl AuditLogPort for SheetAuditLog {
    async fn append(&self, category: LogCategory, entry: &AuditEntry) -> Result<(), DomainError> {
        self.client
            .append_row(
                worksheet_title(self.platform, category),
                &entry.timestamp,
                &entry.message,
            )
            .await
    }
}
