//! X (Twitter) v2 post creation. Implements SocialPort.
//!
//! The raw HTTP status is handed back to the caller; deciding what counts as
//! success is the pipeline's job.

use super::oauth1::OAuth1Signer;
use crate::domain::{DomainError, Platform, PostReceipt};
use crate::ports::{AccessTokenProvider, SocialPort};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

pub struct XPublisher {
    client: reqwest::Client,
    signer: OAuth1Signer,
    tokens: Arc<dyn AccessTokenProvider>,
    endpoint: String,
}

impl XPublisher {
    pub fn new(signer: OAuth1Signer, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer,
            tokens,
            endpoint: TWEETS_URL.to_string(),
        }
    }

    /// Resolve the access token now so an interactive prompt happens at startup.
    pub async fn authorize(&self) -> Result<(), DomainError> {
        self.tokens.access_token().await.map(|_| ())
    }

    fn post_id(body: &str) -> Option<String> {
        serde_json::from_str::<CreateResponse>(body)
            .ok()
            .and_then(|r| r.data)
            .map(|d| d.id)
    }
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreateResponse {
    data: Option<CreatedPost>,
}

#[derive(Deserialize)]
struct CreatedPost {
    id: String,
}

#[async_trait::async_trait]
impl SocialPort for XPublisher {
    fn platform(&self) -> Platform {
        Platform::X
    }

    async fn publish(&self, text: &str) -> Result<PostReceipt, DomainError> {
        let token = self.tokens.access_token().await?;
        // JSON bodies are not part of the OAuth 1.0a signature.
        let header = self
            .signer
            .authorization_header("POST", &self.endpoint, &[], &[], Some(&token))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", header)
            .json(&CreateRequest { text })
            .send()
            .await
            .map_err(|e| DomainError::Platform(format!("X request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if (200..300).contains(&status) {
            debug!(status, "X accepted post");
        } else {
            let snippet: String = body.chars().take(200).collect();
            warn!(status, body = %snippet, "X refused post");
        }

        Ok(PostReceipt {
            status,
            id: Self::post_id(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_from_created_body() {
        let body = r#"{"data":{"id":"1445880548472328192","text":"Hello"}}"#;
        assert_eq!(
            XPublisher::post_id(body).as_deref(),
            Some("1445880548472328192")
        );
    }

    #[test]
    fn test_post_id_absent_on_error_body() {
        let body = r#"{"title":"Forbidden","detail":"duplicate content","status":403}"#;
        assert!(XPublisher::post_id(body).is_none());
        assert!(XPublisher::post_id("not json").is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let json = serde_json::to_string(&CreateRequest { text: "hi #x" }).unwrap();
        assert_eq!(json, r#"{"text":"hi #x"}"#);
    }
}
