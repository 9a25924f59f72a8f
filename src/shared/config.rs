//! Application configuration. API credentials, model ids, paths.

use crate::adapters::ai::DEFAULT_GEMINI_API_URL;
use serde::Deserialize;

/// Model for the document analysis flow. Must accept documents/images.
pub const DEFAULT_DOCUMENT_MODEL: &str = "googleai/gemini-pro-vision";
/// Model for the health Q&A flow.
pub const DEFAULT_QUESTION_MODEL: &str = "gemini-pro";
pub const DEFAULT_REPORTS_DIR: &str = "./reports";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Google AI API key. Read from HEALTH_PORTAL_GOOGLE_API_KEY, falling back to GOOGLE_API_KEY.
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Generative Language REST base. Read from HEALTH_PORTAL_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Read from HEALTH_PORTAL_DOCUMENT_MODEL.
    #[serde(default)]
    pub document_model: Option<String>,

    /// Read from HEALTH_PORTAL_QUESTION_MODEL.
    #[serde(default)]
    pub question_model: Option<String>,

    /// Use the offline mock model instead of the real service. Read from HEALTH_PORTAL_AI_MOCK.
    #[serde(default)]
    pub ai_mock: Option<bool>,

    /// Where saved analysis reports go. Read from HEALTH_PORTAL_REPORTS_DIR.
    #[serde(default)]
    pub reports_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("HEALTH_PORTAL").try_parsing(true));
        if let Ok(path) = std::env::var("HEALTH_PORTAL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the API key if configured. Blank values count as unset.
    pub fn google_api_key(&self) -> Option<String> {
        self.google_api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Returns the REST base. Defaults to the public Generative Language endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string())
    }

    pub fn document_model_or_default(&self) -> String {
        self.document_model
            .clone()
            .unwrap_or_else(|| DEFAULT_DOCUMENT_MODEL.to_string())
    }

    pub fn question_model_or_default(&self) -> String {
        self.question_model
            .clone()
            .unwrap_or_else(|| DEFAULT_QUESTION_MODEL.to_string())
    }

    pub fn reports_dir_or_default(&self) -> String {
        self.reports_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_REPORTS_DIR.to_string())
    }

    pub fn use_mock_ai(&self) -> bool {
        self.ai_mock.unwrap_or(false)
    }
}
