//! Credential ports. How the X publisher obtains its user access token.
//!
//! The interactive PIN exchange is one implementation; stored tokens are another.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

/// OAuth 1.0a token pair (access token or request token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub token: String,
    pub secret: String,
}

/// Supplies the user access token used to sign X requests.
#[async_trait::async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<OAuthToken, DomainError>;
}

/// Human-in-the-loop step: show the authorization URL, return the PIN the user pasted.
#[async_trait::async_trait]
pub trait VerifierPort: Send + Sync {
    async fn verifier(&self, authorization_url: &str) -> Result<String, DomainError>;
}

/// Persistent storage for an access token so restarts skip the PIN step.
#[async_trait::async_trait]
pub trait TokenStorePort: Send + Sync {
    async fn load(&self) -> Result<Option<OAuthToken>, DomainError>;

    async fn save(&self, token: &OAuthToken) -> Result<(), DomainError>;
}
