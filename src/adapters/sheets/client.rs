//! Minimal Google Sheets v4 client: list worksheet titles, append a row.

use super::auth::ServiceAccountAuth;
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Spreadsheet id from a share URL (`.../spreadsheets/d/<id>/edit...`), or the value
/// itself when it is already a bare id.
pub fn spreadsheet_id(url_or_id: &str) -> Result<String, DomainError> {
    let value = url_or_id.trim();
    let id = match value.split_once("/d/") {
        Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or(""),
        None if !value.contains('/') => value,
        None => "",
    };
    if id.is_empty() {
        return Err(DomainError::Setup(format!(
            "cannot find a spreadsheet id in {:?}",
            value
        )));
    }
    Ok(id.to_string())
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Serialize)]
struct ValueRange<'a> {
    values: [[&'a str; 2]; 1],
}

pub struct SheetsClient {
    http: reqwest::Client,
    auth: Arc<ServiceAccountAuth>,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(auth: Arc<ServiceAccountAuth>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn append_url(&self, worksheet: &str) -> String {
        let range = format!("'{}'!A1", worksheet);
        format!(
            "{}/{}/values/{}:append?valueInputOption=RAW",
            SHEETS_API,
            self.spreadsheet_id,
            urlencoding::encode(&range)
        )
    }

    pub async fn worksheet_titles(&self) -> Result<Vec<String>, DomainError> {
        let token = self.auth.bearer().await?;
        let response = self
            .http
            .get(format!("{}/{}", SHEETS_API, self.spreadsheet_id))
            .query(&[("fields", "sheets.properties.title")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DomainError::Setup(format!("spreadsheet lookup failed: {}", e)))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Setup(format!(
                "spreadsheet {} not accessible ({}): {}",
                self.spreadsheet_id,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| DomainError::Setup(format!("Failed to parse spreadsheet metadata: {}", e)))?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    /// Append `[timestamp, message]` after the last row of `worksheet`.
    pub async fn append_row(
        &self,
        worksheet: &str,
        timestamp: &str,
        message: &str,
    ) -> Result<(), DomainError> {
        let token = self.auth.bearer().await?;
        let response = self
            .http
            .post(self.append_url(worksheet))
            .bearer_auth(token)
            .json(&ValueRange {
                values: [[timestamp, message]],
            })
            .send()
            .await
            .map_err(|e| DomainError::AuditLog(format!("append to {} failed: {}", worksheet, e)))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::AuditLog(format!(
                "append to {} refused ({}): {}",
                worksheet,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(())
    }
}
