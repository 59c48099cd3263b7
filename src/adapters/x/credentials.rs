//! Access token providers for the X publisher.

use super::oauth1::PinFlow;
use crate::domain::DomainError;
use crate::ports::{AccessTokenProvider, OAuthToken, TokenStorePort, VerifierPort};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Token supplied up front (environment or config).
pub struct StaticTokenProvider {
    token: OAuthToken,
}

impl StaticTokenProvider {
    pub fn new(token: OAuthToken) -> Self {
        Self { token }
    }
}

#[async_trait::async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<OAuthToken, DomainError> {
        Ok(self.token.clone())
    }
}

/// Interactive PIN authorization, resolved once per process.
///
/// Order: in-memory cache, then the token store, then the PIN exchange.
/// A freshly exchanged token is saved so the next start skips the prompt.
pub struct PinFlowProvider {
    flow: PinFlow,
    verifier: Arc<dyn VerifierPort>,
    store: Option<Arc<dyn TokenStorePort>>,
    cached: Mutex<Option<OAuthToken>>,
}

impl PinFlowProvider {
    pub fn new(flow: PinFlow, verifier: Arc<dyn VerifierPort>) -> Self {
        Self {
            flow,
            verifier,
            store: None,
            cached: Mutex::new(None),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn TokenStorePort>) -> Self {
        self.store = Some(store);
        self
    }

    async fn exchange(&self) -> Result<OAuthToken, DomainError> {
        let request_token = self.flow.request_token().await?;
        let url = PinFlow::authorize_url(&request_token);
        let pin = self.verifier.verifier(&url).await?;
        let pin = pin.trim();
        if pin.is_empty() {
            return Err(DomainError::Auth("empty PIN".to_string()));
        }
        self.flow.access_token(&request_token, pin).await
    }
}

#[async_trait::async_trait]
impl AccessTokenProvider for PinFlowProvider {
    async fn access_token(&self) -> Result<OAuthToken, DomainError> {
        // Held across the exchange so concurrent callers never prompt twice.
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        if let Some(store) = &self.store {
            match store.load().await {
                Ok(Some(token)) => {
                    info!("using stored X access token");
                    *cached = Some(token.clone());
                    return Ok(token);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "token store unreadable; falling back to PIN flow"),
            }
        }

        let token = self.exchange().await?;
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&token).await {
                warn!(error = %e, "could not persist X access token");
            }
        }
        *cached = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::x::oauth1::OAuth1Signer;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MemoryStore(std::sync::Mutex<Option<OAuthToken>>);

    #[async_trait::async_trait]
    impl TokenStorePort for MemoryStore {
        async fn load(&self) -> Result<Option<OAuthToken>, DomainError> {
            Ok(self.0.lock().unwrap().clone())
        }

        async fn save(&self, token: &OAuthToken) -> Result<(), DomainError> {
            *self.0.lock().unwrap() = Some(token.clone());
            Ok(())
        }
    }

    struct CountingVerifier(AtomicU32);

    #[async_trait::async_trait]
    impl VerifierPort for CountingVerifier {
        async fn verifier(&self, _url: &str) -> Result<String, DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("1234567".to_string())
        }
    }

    #[tokio::test]
    async fn test_static_provider() {
        let token = OAuthToken {
            token: "t".into(),
            secret: "s".into(),
        };
        let provider = StaticTokenProvider::new(token.clone());
        assert_eq!(provider.access_token().await.unwrap(), token);
    }

    #[tokio::test]
    async fn test_stored_token_skips_pin_prompt() {
        let stored = OAuthToken {
            token: "stored".into(),
            secret: "secret".into(),
        };
        let store = Arc::new(MemoryStore(std::sync::Mutex::new(Some(stored.clone()))));
        let verifier = Arc::new(CountingVerifier(AtomicU32::new(0)));
        let provider = PinFlowProvider::new(
            PinFlow::new(OAuth1Signer::new("ck", "cs")),
            verifier.clone(),
        )
        .with_store(store);

        assert_eq!(provider.access_token().await.unwrap(), stored);
        assert_eq!(provider.access_token().await.unwrap(), stored);
        assert_eq!(verifier.0.load(Ordering::SeqCst), 0);
    }
}
