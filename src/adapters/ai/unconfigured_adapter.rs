//! Stand-in model adapter used when no API credential is configured.
//!
//! Every call fails with `DomainError::Unconfigured`, so the flows surface a
//! typed error at call time instead of the process refusing to start.

use crate::domain::DomainError;
use crate::ports::{ModelPort, ModelRequest};
use serde_json::Value;
use tracing::warn;

pub const MISSING_KEY_MESSAGE: &str = "set HEALTH_PORTAL_GOOGLE_API_KEY (or GOOGLE_API_KEY) in your environment or .env file";

pub struct UnconfiguredModelAdapter {
    reason: String,
}

impl UnconfiguredModelAdapter {
    pub fn new() -> Self {
        Self::with_reason(MISSING_KEY_MESSAGE)
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnconfiguredModelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModelPort for UnconfiguredModelAdapter {
    async fn generate(&self, request: &ModelRequest) -> Result<Option<Value>, DomainError> {
        warn!(model = %request.model, "model call attempted without credentials");
        Err(DomainError::Unconfigured(self.reason.clone()))
    }
}
