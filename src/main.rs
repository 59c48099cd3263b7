//! Wiring & DI. Entry point: connect adapters, assemble the context, run the scheduler.
//! No business logic here; startup failures are handled by the configured policy.

use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use topic_poster::adapters::ai::{GeminiAdapter, MockAiAdapter, OpenAiAdapter};
use topic_poster::adapters::bluesky::BlueskyClient;
use topic_poster::adapters::persistence::{CsvAuditLog, JsonTokenStore};
use topic_poster::adapters::search::DuckDuckGoNews;
use topic_poster::adapters::sheets::SheetAuditLog;
use topic_poster::adapters::ui::PinPrompt;
use topic_poster::adapters::x::{
    OAuth1Signer, PinFlow, PinFlowProvider, StaticTokenProvider, XPublisher,
};
use topic_poster::domain::{DomainError, Platform};
use topic_poster::ports::{
    AccessTokenProvider, AuditLogPort, NewsSearchPort, OAuthToken, SocialPort, TextGenerationPort,
};
use topic_poster::shared::config::{AiProvider, AppConfig};
use topic_poster::usecases::{
    AppContext, Collaborators, DryRunSocial, SetupReport, SetupStatus, UnavailableSocial,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("configuration: {}", e))?;
    let policy = cfg.startup_policy();
    let data_path = PathBuf::from(cfg.data_dir_or_default());
    info!(path = %data_path.display(), ?policy, "starting up");

    let mut report = SetupReport::new();

    // --- Generative AI (mock when no key) ---
    let (ai, mocked) = build_ai(&cfg, &mut report);

    // --- News search (no credentials) ---
    let news: Arc<dyn NewsSearchPort> = Arc::new(DuckDuckGoNews::new());
    report.record("news search", SetupStatus::Ready);

    // --- Audit logs: spreadsheet per platform, local CSV as fallback ---
    let audit_dir = data_path.join("audit");
    let x_log = report
        .admit(
            policy,
            "x audit sheet",
            connect_sheet(Platform::X, &cfg.x_google_json, &cfg.x_google_sheet).await,
            |_| Arc::new(CsvAuditLog::new(&audit_dir, Platform::X)) as Arc<dyn AuditLogPort>,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let bluesky_log = report
        .admit(
            policy,
            "bluesky audit sheet",
            connect_sheet(Platform::Bluesky, &cfg.b_google_json, &cfg.b_google_sheet).await,
            |_| Arc::new(CsvAuditLog::new(&audit_dir, Platform::Bluesky)) as Arc<dyn AuditLogPort>,
        )
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // --- Platforms (dry run while drafts are mocked) ---
    let (bluesky, x): (Arc<dyn SocialPort>, Arc<dyn SocialPort>) = if mocked {
        for platform in Platform::ALL {
            report.record(
                platform.as_str(),
                SetupStatus::Degraded("dry run: drafts are mocked; posts are only logged".into()),
            );
        }
        (
            Arc::new(DryRunSocial::new(Platform::Bluesky)),
            Arc::new(DryRunSocial::new(Platform::X)),
        )
    } else {
        let bluesky = report
            .admit(policy, "bluesky", connect_bluesky(&cfg).await, |e| {
                Arc::new(UnavailableSocial::new(Platform::Bluesky, e.to_string()))
                    as Arc<dyn SocialPort>
            })
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        let x = report
            .admit(policy, "x", connect_x(&cfg, &data_path).await, |e| {
                Arc::new(UnavailableSocial::new(Platform::X, e.to_string())) as Arc<dyn SocialPort>
            })
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        (bluesky, x)
    };

    println!("Setup:\n{}", report);

    let ctx = AppContext::assemble(
        &cfg,
        Collaborators {
            news,
            ai,
            x,
            bluesky,
            x_log,
            bluesky_log,
        },
    )
    .map_err(|e| anyhow::anyhow!("{}", e))?;

    let scheduler = ctx.scheduler(&cfg);
    tokio::select! {
        _ = scheduler.run_forever() => {}
        _ = tokio::signal::ctrl_c() => info!("interrupted; shutting down"),
    }
    Ok(())
}

/// The generator, and whether it is the mock.
fn build_ai(cfg: &AppConfig, report: &mut SetupReport) -> (Arc<dyn TextGenerationPort>, bool) {
    let Some(key) = cfg.gen_ai_key.clone() else {
        report.record(
            "generative AI",
            SetupStatus::Degraded("GEN_AI_KEY not set; using mock drafts".into()),
        );
        return (Arc::new(MockAiAdapter::new()), true);
    };
    let model = cfg.ai_model_or_default();
    let url = cfg.ai_api_url_or_default();
    info!(provider = ?cfg.ai_provider(), model = %model, url = %url, "generative AI enabled");
    report.record("generative AI", SetupStatus::Ready);
    let ai: Arc<dyn TextGenerationPort> = match cfg.ai_provider() {
        AiProvider::Gemini => Arc::new(GeminiAdapter::new(url, key, model)),
        AiProvider::OpenAi => Arc::new(OpenAiAdapter::new(url, key, model)),
    };
    (ai, false)
}

async fn connect_sheet(
    platform: Platform,
    key_json: &Option<String>,
    sheet_url: &Option<String>,
) -> Result<Arc<dyn AuditLogPort>, DomainError> {
    let (Some(key_json), Some(sheet_url)) = (key_json, sheet_url) else {
        return Err(DomainError::Setup(format!(
            "{} spreadsheet credentials not set",
            platform
        )));
    };
    let log = SheetAuditLog::connect(platform, key_json, sheet_url).await?;
    Ok(Arc::new(log))
}

async fn connect_bluesky(cfg: &AppConfig) -> Result<Arc<dyn SocialPort>, DomainError> {
    let (user, password) = cfg
        .bluesky_credentials()
        .ok_or_else(|| DomainError::Setup("BS_USER / BS_PASSWORD not set".into()))?;
    let client = BlueskyClient::new(cfg.bluesky_service_or_default(), user, password);
    client.login().await?;
    Ok(Arc::new(client))
}

/// Stored tokens when present; otherwise the interactive PIN flow, persisted under `data_path`.
async fn connect_x(cfg: &AppConfig, data_path: &Path) -> Result<Arc<dyn SocialPort>, DomainError> {
    let (key, secret) = cfg
        .x_consumer()
        .ok_or_else(|| DomainError::Setup("CONSUMER_KEY / CONSUMER_SECRET not set".into()))?;
    let signer = OAuth1Signer::new(key, secret);

    let tokens: Arc<dyn AccessTokenProvider> = match cfg.x_stored_access() {
        Some((token, secret)) => {
            info!("using X access token from environment");
            Arc::new(StaticTokenProvider::new(OAuthToken { token, secret }))
        }
        None => Arc::new(
            PinFlowProvider::new(PinFlow::new(signer.clone()), Arc::new(PinPrompt))
                .with_store(Arc::new(JsonTokenStore::new(data_path.join("x_token.json")))),
        ),
    };

    let publisher = XPublisher::new(signer, tokens);
    publisher.authorize().await?;
    Ok(Arc::new(publisher))
}
