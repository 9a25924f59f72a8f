//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, SafetySetting};
use serde_json::Value;

/// One piece of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Reference to an attached document (usually a `data:` URI). Resolved by the adapter.
    Media { url: String },
}

/// Everything the model service needs for a single structured-output call.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Model identifier, e.g. `gemini-pro` or `googleai/gemini-pro-vision`.
    pub model: String,
    pub prompt: Vec<PromptPart>,
    /// JSON-schema-like descriptor of the expected output object.
    pub output_schema: Value,
    pub safety: Vec<SafetySetting>,
}

impl ModelRequest {
    /// Concatenated text parts. Media references are omitted.
    pub fn prompt_text(&self) -> String {
        self.prompt
            .iter()
            .filter_map(|p| match p {
                PromptPart::Text(t) => Some(t.as_str()),
                PromptPart::Media { .. } => None,
            })
            .collect()
    }
}

/// Generative model gateway. One attempt per call; no retry.
#[async_trait::async_trait]
pub trait ModelPort: Send + Sync {
    /// Send the request and return the structured output object.
    ///
    /// `Ok(None)` means the service answered without usable output
    /// (blocked, no candidates, unparsable). Transport and provider failures are `Err`.
    async fn generate(&self, request: &ModelRequest) -> Result<Option<Value>, DomainError>;
}
