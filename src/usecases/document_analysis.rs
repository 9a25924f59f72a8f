//! Document analysis flow. Validates the request, asks the model for a Markdown
//! report about the attached document, and refuses to return an empty report.

use super::flow::{FlowRun, FlowState};
use super::prompt::DOCUMENT_ANALYSIS_PROMPT;
use crate::domain::{
    validate_document_analysis, DocumentAnalysisRequest, DocumentAnalysisResponse, DomainError,
    SafetySetting, ValidDocumentAnalysis,
};
use crate::ports::{ModelPort, ModelRequest};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub const DOCUMENT_ANALYSIS_FLOW: &str = "analyzeMedicalDocumentsFlow";

/// Shown when the model gives no report. The cause cannot be told apart from the
/// response, so the message lists the plausible ones.
pub const EMPTY_REPORT_MESSAGE: &str = "The AI could not generate a report for this document. This may be because the document is unreadable, its content triggered the AI's safety filters, or an internal error occurred. Please try with a different document.";

/// Lenient view of the model output; a shape mismatch is treated as no output.
#[derive(Deserialize)]
struct ReportOutput {
    #[serde(default)]
    report: Option<String>,
}

/// Flow: data-URI document + user context → Markdown report.
///
/// Stateless apart from the injected model client; safe to share between callers.
pub struct DocumentAnalysisFlow {
    model: Arc<dyn ModelPort>,
    model_id: String,
}

impl DocumentAnalysisFlow {
    /// # Arguments
    /// * `model` - Model gateway (Gemini, mock, or unconfigured)
    /// * `model_id` - Model identifier sent with every call (must accept documents/images)
    pub fn new(model: Arc<dyn ModelPort>, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Output descriptor sent to the model.
    pub fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "report": {
                    "type": "STRING",
                    "description": "A comprehensive report in Markdown format, including sections for Summary, Key Points, and Questions for Your Doctor."
                }
            },
            "required": ["report"]
        })
    }

    /// Build the model request for an already validated input.
    pub fn build_request(&self, input: &ValidDocumentAnalysis) -> ModelRequest {
        ModelRequest {
            model: self.model_id.clone(),
            prompt: DOCUMENT_ANALYSIS_PROMPT.render(&[
                ("user_context", input.user_context.as_str()),
                ("document", input.document.as_str()),
            ]),
            output_schema: Self::output_schema(),
            safety: SafetySetting::permissive_policy(),
        }
    }

    pub async fn run(
        &self,
        request: &DocumentAnalysisRequest,
    ) -> Result<DocumentAnalysisResponse, DomainError> {
        let mut run = FlowRun::start(DOCUMENT_ANALYSIS_FLOW);
        let result = self.execute(&mut run, request).await;
        run.finish(result)
    }

    async fn execute(
        &self,
        run: &mut FlowRun,
        request: &DocumentAnalysisRequest,
    ) -> Result<DocumentAnalysisResponse, DomainError> {
        run.enter(FlowState::Validating);
        let input = validate_document_analysis(request)?;

        run.enter(FlowState::Invoking);
        let model_request = self.build_request(&input);
        info!(
            model = %self.model_id,
            document_len = input.document.as_str().len(),
            context_len = input.user_context.len(),
            "requesting document analysis"
        );
        let output = self.model.generate(&model_request).await?;

        match extract_report(output) {
            Some(report) => Ok(DocumentAnalysisResponse { report }),
            None => {
                warn!(model = %self.model_id, "model returned no report");
                Err(DomainError::EmptyOutput(EMPTY_REPORT_MESSAGE.to_string()))
            }
        }
    }
}

fn extract_report(output: Option<Value>) -> Option<String> {
    let parsed: ReportOutput = serde_json::from_value(output?).ok()?;
    parsed.report.filter(|r| !r.is_empty())
}

/// Run the document analysis flow once with the given client.
pub async fn analyze_medical_document(
    model: Arc<dyn ModelPort>,
    model_id: &str,
    request: &DocumentAnalysisRequest,
) -> Result<DocumentAnalysisResponse, DomainError> {
    DocumentAnalysisFlow::new(model, model_id).run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockModelAdapter, UnconfiguredModelAdapter};
    use crate::domain::{HarmBlockThreshold, HarmCategory};
    use crate::ports::PromptPart;

    const MODEL: &str = "googleai/gemini-pro-vision";

    fn cough_request() -> DocumentAnalysisRequest {
        DocumentAnalysisRequest::new("data:application/pdf;base64,AAAA", "35-year-old with cough")
    }

    #[tokio::test]
    async fn test_report_returned_verbatim() {
        let report = "### Analysis Summary\n...### Disclaimer\n...";
        let mock = Arc::new(MockModelAdapter::returning(Some(json!({ "report": report }))));
        let flow = DocumentAnalysisFlow::new(mock.clone(), MODEL);

        let response = flow.run(&cough_request()).await.unwrap();

        assert_eq!(response.report, report);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_report_key_fails() {
        let mock = Arc::new(MockModelAdapter::returning(Some(json!({}))));
        let flow = DocumentAnalysisFlow::new(mock, MODEL);

        let err = flow.run(&cough_request()).await.unwrap_err();

        assert!(matches!(err, DomainError::EmptyOutput(_)));
        let msg = err.to_string();
        assert!(msg.contains("could not generate a report"));
        assert!(msg.contains("try with a different document"));
    }

    #[tokio::test]
    async fn test_absent_or_empty_output_fails() {
        for output in [None, Some(json!({ "report": "" })), Some(json!({ "report": 12 }))] {
            let flow = DocumentAnalysisFlow::new(Arc::new(MockModelAdapter::returning(output)), MODEL);
            let err = flow.run(&cough_request()).await.unwrap_err();
            assert_eq!(err.to_string(), EMPTY_REPORT_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_whitespace_report_returned_verbatim() {
        let mock = Arc::new(MockModelAdapter::returning(Some(json!({ "report": " \n" }))));
        let flow = DocumentAnalysisFlow::new(mock, MODEL);

        let response = flow.run(&cough_request()).await.unwrap();

        assert_eq!(response.report, " \n");
    }

    #[tokio::test]
    async fn test_model_unavailable_is_not_masked() {
        let mock = Arc::new(MockModelAdapter::failing(DomainError::ModelUnavailable(
            "API error 503 Service Unavailable".to_string(),
        )));
        let flow = DocumentAnalysisFlow::new(mock.clone(), MODEL);

        let err = flow.run(&cough_request()).await.unwrap_err();

        assert!(matches!(err, DomainError::ModelUnavailable(_)));
        assert!(err.to_string().contains("503"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_never_calls_model() {
        let mock = Arc::new(MockModelAdapter::returning(Some(json!({ "report": "x" }))));
        let flow = DocumentAnalysisFlow::new(mock.clone(), MODEL);

        let no_context = DocumentAnalysisRequest {
            document: Some("data:application/pdf;base64,AAAA".into()),
            user_context: None,
        };
        let no_document = DocumentAnalysisRequest {
            document: None,
            user_context: Some("cough".into()),
        };
        for req in [no_context, no_document] {
            let err = flow.run(&req).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_sent_to_model() {
        let mock = Arc::new(MockModelAdapter::returning(Some(json!({ "report": "ok" }))));
        let flow = DocumentAnalysisFlow::new(mock.clone(), MODEL);
        flow.run(&cough_request()).await.unwrap();

        let calls = mock.calls();
        let sent = &calls[0];
        assert_eq!(sent.model, MODEL);
        assert_eq!(sent.output_schema["required"], json!(["report"]));
        assert!(sent.prompt_text().contains("35-year-old with cough"));
        assert!(sent.prompt.contains(&PromptPart::Media {
            url: "data:application/pdf;base64,AAAA".to_string()
        }));
        assert_eq!(sent.safety.len(), 4);
        for category in HarmCategory::ALL {
            assert!(sent
                .safety
                .iter()
                .any(|s| s.category == category && s.threshold == HarmBlockThreshold::BlockNone));
        }
    }

    #[tokio::test]
    async fn test_unconfigured_client_surfaces_typed_error() {
        let flow = DocumentAnalysisFlow::new(Arc::new(UnconfiguredModelAdapter::new()), MODEL);
        let err = flow.run(&cough_request()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unconfigured(_)));
    }

    #[tokio::test]
    async fn test_free_function() {
        let report = "### Analysis Summary\nAll normal.";
        let mock: Arc<dyn ModelPort> =
            Arc::new(MockModelAdapter::returning(Some(json!({ "report": report }))));
        let response = analyze_medical_document(mock, MODEL, &cough_request())
            .await
            .unwrap();
        assert_eq!(response.report, report);
    }
}
