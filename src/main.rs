//! Wiring & DI. Entry point: build the model client, inject it into the flows, run UI.
//! No business logic here.

use dotenv::dotenv;
use health_portal_ai::adapters::ai::{GeminiAdapter, MockModelAdapter, UnconfiguredModelAdapter};
use health_portal_ai::adapters::persistence::FsReportStore;
use health_portal_ai::adapters::ui::tui::TuiInputPort;
use health_portal_ai::ports::{InputPort, ModelPort, ReportStorePort};
use health_portal_ai::shared::config::AppConfig;
use health_portal_ai::usecases::{DocumentAnalysisFlow, HealthQuestionFlow};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

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

    health_portal_ai::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        AppConfig::default()
    });

    // --- Model client: constructed once, injected into both flows ---
    let model: Arc<dyn ModelPort> = if cfg.use_mock_ai() {
        warn!("HEALTH_PORTAL_AI_MOCK is set, using mock model adapter");
        Arc::new(MockModelAdapter::new())
    } else if let Some(api_key) = cfg.google_api_key() {
        info!(url = %cfg.ai_api_url_or_default(), "AI features enabled with Gemini adapter");
        Arc::new(GeminiAdapter::new(cfg.ai_api_url_or_default(), api_key))
    } else {
        warn!("GOOGLE_API_KEY is not set; AI features will fail until the key is provided in .env");
        Arc::new(UnconfiguredModelAdapter::new())
    };

    // --- Flows ---
    let document_model = cfg.document_model_or_default();
    let question_model = cfg.question_model_or_default();
    info!(document_model = %document_model, question_model = %question_model, "models");
    let documents = Arc::new(DocumentAnalysisFlow::new(Arc::clone(&model), document_model));
    let questions = Arc::new(HealthQuestionFlow::new(Arc::clone(&model), question_model));

    let reports_dir = PathBuf::from(cfg.reports_dir_or_default());
    let reports: Arc<dyn ReportStorePort> = Arc::new(FsReportStore::new(&reports_dir));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(documents, questions, reports));

    // --- Run (main menu -> Ask / Analyze / Exit) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
