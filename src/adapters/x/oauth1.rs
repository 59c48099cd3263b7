//! OAuth 1.0a request signing (HMAC-SHA1) and the three-legged PIN flow endpoints.

use crate::domain::DomainError;
use crate::ports::OAuthToken;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;
use tracing::{debug, info};

type HmacSha1 = Hmac<Sha1>;

pub const REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
pub const AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
pub const ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";

/// RFC 3986 percent-encoding, as OAuth 1.0a requires.
fn enc(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Signature base string: METHOD & url & sorted, encoded parameters.
pub fn signature_base(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (enc(k), enc(v))).collect();
    encoded.sort();
    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        enc(url),
        enc(&joined)
    )
}

pub fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String, DomainError> {
    let key = format!("{}&{}", enc(consumer_secret), enc(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| DomainError::Auth(format!("HMAC key rejected: {}", e)))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Consumer (application) credentials. Signs requests on behalf of a user token.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
}

impl OAuth1Signer {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// `Authorization` header value for a request.
    ///
    /// `query` holds query-string or form parameters that take part in the signature;
    /// `oauth_extra` holds additional `oauth_*` protocol parameters (callback, verifier).
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        query: &[(&str, &str)],
        oauth_extra: &[(&str, &str)],
        token: Option<&OAuthToken>,
    ) -> Result<String, DomainError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.header_with(method, url, query, oauth_extra, token, &nonce(), &timestamp)
    }

    #[allow(clippy::too_many_arguments)]
    fn header_with(
        &self,
        method: &str,
        url: &str,
        query: &[(&str, &str)],
        oauth_extra: &[(&str, &str)],
        token: Option<&OAuthToken>,
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, DomainError> {
        let mut oauth: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer_key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), timestamp.to_string()),
            ("oauth_version".into(), "1.0".into()),
        ];
        if let Some(t) = token {
            oauth.push(("oauth_token".into(), t.token.clone()));
        }
        oauth.extend(oauth_extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let mut all = oauth.clone();
        all.extend(query.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let base = signature_base(method, url, &all);
        let token_secret = token.map(|t| t.secret.as_str()).unwrap_or("");
        let signature = sign(&base, &self.consumer_secret, token_secret)?;
        oauth.push(("oauth_signature".into(), signature));
        oauth.sort();

        let fields = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", enc(k), enc(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", fields))
    }
}

/// Parse an `oauth_token=..&oauth_token_secret=..` form body.
pub fn parse_token_response(body: &str) -> Result<OAuthToken, DomainError> {
    let mut token = None;
    let mut secret = None;
    for pair in body.trim().split('&') {
        let Some((k, v)) = pair.split_once('=') else {
            continue;
        };
        let v = urlencoding::decode(v)
            .map_err(|e| DomainError::Auth(format!("bad token encoding: {}", e)))?
            .into_owned();
        match k {
            "oauth_token" => token = Some(v),
            "oauth_token_secret" => secret = Some(v),
            _ => {}
        }
    }
    match (token, secret) {
        (Some(token), Some(secret)) => Ok(OAuthToken { token, secret }),
        _ => Err(DomainError::Auth(format!(
            "token response missing fields: {}",
            body.chars().take(200).collect::<String>()
        ))),
    }
}

/// Three-legged PIN (out-of-band) flow against the X OAuth endpoints.
pub struct PinFlow {
    client: reqwest::Client,
    signer: OAuth1Signer,
}

impl PinFlow {
    pub fn new(signer: OAuth1Signer) -> Self {
        Self {
            client: reqwest::Client::new(),
            signer,
        }
    }

    /// Step 1: temporary request token with write access.
    pub async fn request_token(&self) -> Result<OAuthToken, DomainError> {
        let query = [("x_auth_access_type", "write")];
        let header = self.signer.authorization_header(
            "POST",
            REQUEST_TOKEN_URL,
            &query,
            &[("oauth_callback", "oob")],
            None,
        )?;
        let body = self
            .post_form(REQUEST_TOKEN_URL, &query, header, "request token")
            .await?;
        let token = parse_token_response(&body)?;
        debug!("obtained request token");
        Ok(token)
    }

    pub fn authorize_url(request_token: &OAuthToken) -> String {
        format!("{}?oauth_token={}", AUTHORIZE_URL, enc(&request_token.token))
    }

    /// Step 3: trade the request token and PIN for a long-lived access token.
    pub async fn access_token(
        &self,
        request_token: &OAuthToken,
        verifier: &str,
    ) -> Result<OAuthToken, DomainError> {
        let header = self.signer.authorization_header(
            "POST",
            ACCESS_TOKEN_URL,
            &[],
            &[("oauth_verifier", verifier)],
            Some(request_token),
        )?;
        let body = self
            .post_form(ACCESS_TOKEN_URL, &[], header, "access token")
            .await?;
        let token = parse_token_response(&body)?;
        info!("X access token obtained");
        Ok(token)
    }

    async fn post_form(
        &self,
        url: &str,
        query: &[(&str, &str)],
        header: String,
        what: &str,
    ) -> Result<String, DomainError> {
        let response = self
            .client
            .post(url)
            .query(query)
            .header("Authorization", header)
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("{} request failed: {}", what, e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::Auth(format!("{} body unreadable: {}", what, e)))?;
        if !status.is_success() {
            return Err(DomainError::Auth(format!(
                "{} refused ({}): {}",
                what,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(body)
    }
}
