//! Google service-account authentication for the Sheets API.
//!
//! A self-signed RS256 JWT is exchanged at the token endpoint for a bearer token,
//! which is cached until shortly before it expires.

use crate::domain::DomainError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the cached token's expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// The fields of a service-account key file this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse key JSON. Raw newlines inside string values (common when the key is pasted
    /// into an environment variable) are tolerated.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(&escape_raw_controls(raw))
            .map_err(|e| DomainError::Setup(format!("invalid service account JSON: {}", e)))
    }

    /// Accept either the JSON itself or a path to a key file.
    pub async fn from_json_or_path(value: &str) -> Result<Self, DomainError> {
        if value.trim_start().starts_with('{') {
            return Self::from_json(value);
        }
        let raw = tokio::fs::read_to_string(value.trim())
            .await
            .map_err(|e| DomainError::Setup(format!("read key file {}: {}", value, e)))?;
        Self::from_json(&raw)
    }
}

/// Escape control characters that appear inside JSON string literals.
fn escape_raw_controls(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in raw.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            } else if c == '\n' {
                out.push_str("\\n");
                continue;
            } else if c == '\r' {
                out.push_str("\\r");
                continue;
            } else if c == '\t' {
                out.push_str("\\t");
                continue;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    JWT_LIFETIME_SECS as u64
}

pub struct ServiceAccountAuth {
    http: reqwest::Client,
    key: ServiceAccountKey,
    cached: Mutex<Option<(String, Instant)>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            http: reqwest::Client::new(),
            key,
            cached: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn assertion(&self, now: i64) -> Result<String, DomainError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + JWT_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| DomainError::Setup(format!("invalid service account key: {}", e)))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| DomainError::Setup(format!("JWT signing failed: {}", e)))
    }

    /// Bearer token for the Sheets API.
    pub async fn bearer(&self) -> Result<String, DomainError> {
        let mut cached = self.cached.lock().await;
        if let Some((token, expires)) = cached.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < *expires {
                return Ok(token.clone());
            }
        }

        let assertion = self.assertion(chrono::Utc::now().timestamp())?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::AuditLog(format!("token request failed: {}", e)))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::AuditLog(format!(
                "token request refused ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::AuditLog(format!("Failed to parse token response: {}", e)))?;

        debug!(account = %self.key.client_email, expires_in = token.expires_in, "Google token refreshed");
        let expires = Instant::now() + Duration::from_secs(token.expires_in);
        *cached = Some((token.access_token.clone(), expires));
        Ok(token.access_token)
    }
}
