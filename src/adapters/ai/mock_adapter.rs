//! Mock model adapter for development and tests without API calls.
//!
//! Returns a scripted output (or a canned one matching the requested schema)
//! and records every request it receives.

use crate::domain::DomainError;
use crate::ports::{ModelPort, ModelRequest};
use crate::usecases::prompt::REPORT_DISCLAIMER;
use serde_json::{json, Value};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::info;

enum Script {
    /// Answer from the requested schema.
    Canned,
    /// Replay this output on every call.
    Output(Option<Value>),
    /// Fail every call with this error.
    Fail(DomainError),
}

/// Mock model adapter.
///
/// Simulates network latency with a configurable delay.
pub struct MockModelAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    script: Script,
    calls: Mutex<Vec<ModelRequest>>,
}

impl MockModelAdapter {
    /// Create a new mock adapter with canned answers and default delay (100ms).
    pub fn new() -> Self {
        Self {
            delay_ms: 100,
            script: Script::Canned,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new()
        }
    }

    /// Mock that returns `output` for every call, without delay. `None` simulates absent output.
    pub fn returning(output: Option<Value>) -> Self {
        Self {
            delay_ms: 0,
            script: Script::Output(output),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock whose every call fails with `error`, without delay.
    pub fn failing(error: DomainError) -> Self {
        Self {
            delay_ms: 0,
            script: Script::Fail(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<ModelRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn canned_output(request: &ModelRequest) -> Value {
        let required = request.output_schema["required"][0].as_str().unwrap_or_default();
        match required {
            "report" => json!({
                "report": format!(
                    "### Analysis Summary\n[MOCK] Simulated analysis of the uploaded document ({} prompt characters). \
                     In production the model would explain the document's findings in plain language.\n\n\
                     ### Key Points\n- [MOCK] Key finding one\n- [MOCK] Key finding two\n\n\
                     ### Questions for Your Doctor\n- [MOCK] What do these results mean for me?\n- [MOCK] Do I need any follow-up tests?\n\n\
                     ### Disclaimer\n{}",
                    request.prompt_text().len(),
                    REPORT_DISCLAIMER
                )
            }),
            "answer" => json!({
                "answer": "[MOCK] This is a simulated answer. Configure a Google AI API key to get real answers from the model."
            }),
            _ => json!({}),
        }
    }
}

impl Default for MockModelAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ModelPort for MockModelAdapter {
    async fn generate(&self, request: &ModelRequest) -> Result<Option<Value>, DomainError> {
        info!(
            model = %request.model,
            parts = request.prompt.len(),
            "[MOCK] Simulating model call"
        );

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.script {
            Script::Canned => Ok(Some(Self::canned_output(request))),
            Script::Output(output) => Ok(output.clone()),
            Script::Fail(error) => Err(error.clone()),
        }
    }
}
