//! Bluesky (AT Protocol) client. Implements SocialPort.
//!
//! Session: createSession on first use, refreshSession when the access JWT expires.

use super::facets::{Facet, hashtag_facets};
use crate::domain::{DomainError, Platform, PostReceipt};
use crate::ports::SocialPort;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    refresh_jwt: String,
    did: String,
    #[serde(default)]
    handle: String,
}

#[derive(Serialize)]
struct CreateSession<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateRecord<'a> {
    repo: &'a str,
    collection: &'static str,
    record: PostRecord<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    kind: &'static str,
    text: &'a str,
    created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
}

#[derive(Deserialize)]
struct XrpcError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct CreatedRecord {
    uri: String,
}

/// Outcome of one createRecord call, before session handling.
enum Attempt {
    Created(PostReceipt),
    Expired,
}

pub struct BlueskyClient {
    client: reqwest::Client,
    service: String,
    identifier: String,
    password: String,
    session: RwLock<Option<Session>>,
}

impl BlueskyClient {
    pub fn new(
        service: impl Into<String>,
        identifier: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            service: service.into().trim_end_matches('/').to_string(),
            identifier: identifier.into(),
            password: password.into(),
            session: RwLock::new(None),
        }
    }

    fn xrpc(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service, method)
    }

    /// Log in with identifier and app password. Called at setup and on demand.
    pub async fn login(&self) -> Result<(), DomainError> {
        let response = self
            .client
            .post(self.xrpc("com.atproto.server.createSession"))
            .json(&CreateSession {
                identifier: &self.identifier,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("Bluesky login failed: {}", e)))?;
        let session: Session = Self::parse(response, DomainError::Auth).await?;
        info!(handle = %session.handle, "Bluesky session established");
        *self.session.write().await = Some(session);
        Ok(())
    }

    async fn refresh(&self) -> Result<(), DomainError> {
        let current = self.session.read().await.clone();
        let Some(refresh_jwt) = current.map(|s| s.refresh_jwt) else {
            return self.login().await;
        };
        let response = self
            .client
            .post(self.xrpc("com.atproto.server.refreshSession"))
            .bearer_auth(refresh_jwt)
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("Bluesky refresh failed: {}", e)))?;
        match Self::parse::<Session>(response, DomainError::Auth).await {
            Ok(session) => {
                debug!("Bluesky session refreshed");
                *self.session.write().await = Some(session);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "refresh rejected; logging in again");
                self.login().await
            }
        }
    }

    async fn current_session(&self) -> Result<Session, DomainError> {
        if let Some(s) = self.session.read().await.as_ref() {
            return Ok(s.clone());
        }
        self.login().await?;
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| DomainError::Auth("Bluesky session missing after login".to_string()))
    }

    async fn create_post(&self, text: &str) -> Result<Attempt, DomainError> {
        let session = self.current_session().await?;
        let body = CreateRecord {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: PostRecord {
                kind: POST_COLLECTION,
                text,
                created_at: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                facets: hashtag_facets(text),
            },
        };

        let response = self
            .client
            .post(self.xrpc("com.atproto.repo.createRecord"))
            .bearer_auth(&session.access_jwt)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Platform(format!("Bluesky request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        if (200..300).contains(&status) {
            let id = serde_json::from_str::<CreatedRecord>(&text).ok().map(|r| r.uri);
            return Ok(Attempt::Created(PostReceipt { status, id }));
        }

        let err: Option<XrpcError> = serde_json::from_str(&text).ok();
        if err.as_ref().is_some_and(|e| e.error == "ExpiredToken") {
            return Ok(Attempt::Expired);
        }
        let detail = err
            .map(|e| format!("{}: {}", e.error, e.message))
            .unwrap_or_else(|| text.chars().take(200).collect());
        Err(DomainError::Platform(format!(
            "Bluesky refused post ({}): {}",
            status, detail
        )))
    }

    async fn parse<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
        wrap: fn(String) -> DomainError,
    ) -> Result<T, DomainError> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            let detail = serde_json::from_str::<XrpcError>(&text)
                .map(|e| format!("{}: {}", e.error, e.message))
                .unwrap_or_else(|_| text.chars().take(200).collect());
            return Err(wrap(format!("{} {}", status, detail)));
        }
        serde_json::from_str(&text).map_err(|e| wrap(format!("unexpected response: {}", e)))
    }
}

#[async_trait::async_trait]
impl SocialPort for BlueskyClient {
    fn platform(&self) -> Platform {
        Platform::Bluesky
    }

    async fn publish(&self, text: &str) -> Result<PostReceipt, DomainError> {
        match self.create_post(text).await? {
            Attempt::Created(receipt) => Ok(receipt),
            Attempt::Expired => {
                self.refresh().await?;
                match self.create_post(text).await? {
                    Attempt::Created(receipt) => Ok(receipt),
                    Attempt::Expired => Err(DomainError::Platform(
                        "Bluesky token expired again after refresh".to_string(),
                    )),
                }
            }
        }
    }
}
