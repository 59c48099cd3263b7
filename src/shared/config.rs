//! Application configuration. Credentials, retry policy, schedule.

use serde::Deserialize;
use std::time::Duration;

/// Attempts a publication run may consume before giving up.
pub const DEFAULT_MAX_RETRIES: u32 = 5;
/// Pause after a rejected or too-long draft.
pub const DEFAULT_REJECTION_PAUSE_SECS: u64 = 30;
/// Pause after a failed collaborator call.
pub const DEFAULT_ERROR_PAUSE_SECS: u64 = 600;
/// Enforced length ceiling. The drafting prompt asks for 280; the check allows 300.
pub const DEFAULT_MAX_POST_CHARS: usize = 300;
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_TIMEZONE: &str = "America/Bogota";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Which generative-text backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    OpenAi,
}

/// What to do when a collaborator cannot be set up at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupPolicy {
    /// Report the failure and continue with a local fallback where one exists.
    FailOpen,
    /// Abort startup on the first failure.
    FailClosed,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Credentials (historical variable names, read without prefix)
    // ─────────────────────────────────────────────────────────────────────────
    /// Generative AI API key. Read from GEN_AI_KEY.
    #[serde(default)]
    pub gen_ai_key: Option<String>,

    /// X consumer key. Read from CONSUMER_KEY.
    #[serde(default)]
    pub consumer_key: Option<String>,

    /// X consumer secret. Read from CONSUMER_SECRET.
    #[serde(default)]
    pub consumer_secret: Option<String>,

    /// Pre-authorized X access token. Read from X_ACCESS_TOKEN.
    #[serde(default)]
    pub x_access_token: Option<String>,

    /// Pre-authorized X access token secret. Read from X_ACCESS_TOKEN_SECRET.
    #[serde(default)]
    pub x_access_token_secret: Option<String>,

    /// Bluesky handle. Read from BS_USER.
    #[serde(default)]
    pub bs_user: Option<String>,

    /// Bluesky app password. Read from BS_PASSWORD.
    #[serde(default)]
    pub bs_password: Option<String>,

    /// Service-account JSON for the X audit spreadsheet. Read from XGOOGLE_JSON.
    #[serde(default)]
    pub x_google_json: Option<String>,

    /// URL of the X audit spreadsheet. Read from XGOOGLE_SHEET.
    #[serde(default)]
    pub x_google_sheet: Option<String>,

    /// Service-account JSON for the Bluesky audit spreadsheet. Read from BGOOGLE_JSON.
    #[serde(default)]
    pub b_google_json: Option<String>,

    /// URL of the Bluesky audit spreadsheet. Read from BGOOGLE_SHEET.
    #[serde(default)]
    pub b_google_sheet: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Tunables (TOPIC_POSTER_ prefix)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub max_retries: Option<u32>,

    #[serde(default)]
    pub rejection_pause_secs: Option<u64>,

    #[serde(default)]
    pub error_pause_secs: Option<u64>,

    #[serde(default)]
    pub max_post_chars: Option<usize>,

    /// Seconds between scheduled runs (default one hour).
    #[serde(default)]
    pub interval_secs: Option<u64>,

    /// IANA zone used for the schedule and audit timestamps.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Fire one run immediately instead of waiting a full interval.
    #[serde(default)]
    pub run_on_start: Option<bool>,

    /// "gemini" (default) or "openai".
    #[serde(default)]
    pub ai_provider: Option<String>,

    #[serde(default)]
    pub ai_model: Option<String>,

    /// Endpoint override for OpenAI-compatible providers.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    #[serde(default)]
    pub bluesky_service: Option<String>,

    #[serde(default)]
    pub data_dir: Option<String>,

    /// "fail-open" (default) or "fail-closed".
    #[serde(default)]
    pub startup_policy: Option<String>,

    /// Count too-long drafts against `max_retries` (default false).
    #[serde(default)]
    pub count_long_drafts: Option<bool>,

    /// Retry after a non-201 answer from X instead of stopping (default false).
    #[serde(default)]
    pub retry_on_platform_error: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TOPIC_POSTER"));
        if let Ok(path) = std::env::var("TOPIC_POSTER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        cfg.apply_credential_env();
        Ok(cfg)
    }

    /// Credentials keep their historical unprefixed names, so they are read directly.
    fn apply_credential_env(&mut self) {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let pairs: [(&mut Option<String>, &str); 11] = [
            (&mut self.gen_ai_key, "GEN_AI_KEY"),
            (&mut self.consumer_key, "CONSUMER_KEY"),
            (&mut self.consumer_secret, "CONSUMER_SECRET"),
            (&mut self.x_access_token, "X_ACCESS_TOKEN"),
            (&mut self.x_access_token_secret, "X_ACCESS_TOKEN_SECRET"),
            (&mut self.bs_user, "BS_USER"),
            (&mut self.bs_password, "BS_PASSWORD"),
            (&mut self.x_google_json, "XGOOGLE_JSON"),
            (&mut self.x_google_sheet, "XGOOGLE_SHEET"),
            (&mut self.b_google_json, "BGOOGLE_JSON"),
            (&mut self.b_google_sheet, "BGOOGLE_SHEET"),
        ];
        for (slot, name) in pairs {
            if slot.is_none() {
                *slot = read(name);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Retry policy
    // ─────────────────────────────────────────────────────────────────────────

    pub fn max_retries_or_default(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn rejection_pause(&self) -> Duration {
        Duration::from_secs(
            self.rejection_pause_secs
                .unwrap_or(DEFAULT_REJECTION_PAUSE_SECS),
        )
    }

    pub fn error_pause(&self) -> Duration {
        Duration::from_secs(self.error_pause_secs.unwrap_or(DEFAULT_ERROR_PAUSE_SECS))
    }

    pub fn max_post_chars_or_default(&self) -> usize {
        self.max_post_chars.unwrap_or(DEFAULT_MAX_POST_CHARS)
    }

    pub fn count_long_drafts(&self) -> bool {
        self.count_long_drafts.unwrap_or(false)
    }

    pub fn retry_on_platform_error(&self) -> bool {
        self.retry_on_platform_error.unwrap_or(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Schedule
    // ─────────────────────────────────────────────────────────────────────────

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS).max(1))
    }

    pub fn timezone_or_default(&self) -> String {
        self.timezone
            .clone()
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
    }

    pub fn run_on_start(&self) -> bool {
        self.run_on_start.unwrap_or(false)
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Unknown values fall back to fail-open, the historical behaviour.
    pub fn startup_policy(&self) -> StartupPolicy {
        match self.startup_policy.as_deref().map(str::trim) {
            Some("fail-closed") | Some("fail_closed") | Some("closed") => {
                StartupPolicy::FailClosed
            }
            _ => StartupPolicy::FailOpen,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn ai_provider(&self) -> AiProvider {
        match self
            .ai_provider
            .as_deref()
            .map(|p| p.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("openai") => AiProvider::OpenAi,
            _ => AiProvider::Gemini,
        }
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model.clone().unwrap_or_else(|| match self.ai_provider() {
            AiProvider::Gemini => DEFAULT_GEMINI_MODEL.to_string(),
            AiProvider::OpenAi => DEFAULT_OPENAI_MODEL.to_string(),
        })
    }

    /// Endpoint for the configured provider. Gemini's URL is built per model by the adapter.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url.clone().unwrap_or_else(|| match self.ai_provider() {
            AiProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta".to_string(),
            AiProvider::OpenAi => "https://api.openai.com/v1/chat/completions".to_string(),
        })
    }

    /// Returns true if AI is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.gen_ai_key.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn bluesky_service_or_default(&self) -> String {
        self.bluesky_service
            .clone()
            .unwrap_or_else(|| "https://bsky.social".to_string())
    }

    /// Consumer key and secret, when both are set.
    pub fn x_consumer(&self) -> Option<(String, String)> {
        Some((self.consumer_key.clone()?, self.consumer_secret.clone()?))
    }

    /// Access token and secret supplied through the environment, when both are set.
    pub fn x_stored_access(&self) -> Option<(String, String)> {
        Some((
            self.x_access_token.clone()?,
            self.x_access_token_secret.clone()?,
        ))
    }

    pub fn bluesky_credentials(&self) -> Option<(String, String)> {
        Some((self.bs_user.clone()?, self.bs_password.clone()?))
    }
}
