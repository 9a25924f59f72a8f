//! Health Q&A flow. Free-text question in, free-text answer out.

use super::flow::{FlowRun, FlowState};
use super::prompt::HEALTH_QUESTION_PROMPT;
use crate::domain::{
    validate_question, DomainError, QuestionAnswer, QuestionRequest, SafetySetting, ValidQuestion,
};
use crate::ports::{ModelPort, ModelRequest};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub const HEALTH_QUESTION_FLOW: &str = "answerHealthQuestionsFlow";

/// A blank answer is treated like a missing one, same as an empty report.
pub const EMPTY_ANSWER_MESSAGE: &str = "The AI could not generate an answer to this question. This may be because its content triggered the AI's safety filters or an internal error occurred. Please try rephrasing your question.";

#[derive(Deserialize)]
struct AnswerOutput {
    #[serde(default)]
    answer: Option<String>,
}

pub struct HealthQuestionFlow {
    model: Arc<dyn ModelPort>,
    model_id: String,
}

impl HealthQuestionFlow {
    pub fn new(model: Arc<dyn ModelPort>, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "answer": {
                    "type": "STRING",
                    "description": "The answer to the user's health question."
                }
            },
            "required": ["answer"]
        })
    }

    pub fn build_request(&self, input: &ValidQuestion) -> ModelRequest {
        ModelRequest {
            model: self.model_id.clone(),
            prompt: HEALTH_QUESTION_PROMPT.render(&[("question", input.question.as_str())]),
            output_schema: Self::output_schema(),
            safety: SafetySetting::permissive_policy(),
        }
    }

    pub async fn run(&self, request: &QuestionRequest) -> Result<QuestionAnswer, DomainError> {
        let mut run = FlowRun::start(HEALTH_QUESTION_FLOW);
        let result = self.execute(&mut run, request).await;
        run.finish(result)
    }

    async fn execute(
        &self,
        run: &mut FlowRun,
        request: &QuestionRequest,
    ) -> Result<QuestionAnswer, DomainError> {
        run.enter(FlowState::Validating);
        let input = validate_question(request)?;

        run.enter(FlowState::Invoking);
        info!(
            model = %self.model_id,
            question_len = input.question.len(),
            "requesting health answer"
        );
        let output = self.model.generate(&self.build_request(&input)).await?;

        let answer = output
            .and_then(|v| serde_json::from_value::<AnswerOutput>(v).ok())
            .and_then(|o| o.answer)
            .filter(|a| !a.trim().is_empty());
        match answer {
            Some(answer) => Ok(QuestionAnswer { answer }),
            None => {
                warn!(model = %self.model_id, "model returned no answer");
                Err(DomainError::EmptyOutput(EMPTY_ANSWER_MESSAGE.to_string()))
            }
        }
    }
}

/// Run the health Q&A flow once with the given client.
pub async fn answer_health_question(
    model: Arc<dyn ModelPort>,
    model_id: &str,
    request: &QuestionRequest,
) -> Result<QuestionAnswer, DomainError> {
    HealthQuestionFlow::new(model, model_id).run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockModelAdapter, UnconfiguredModelAdapter};

    const MODEL: &str = "gemini-pro";

    #[tokio::test]
    async fn test_answer_returned_verbatim() {
        let mock = Arc::new(MockModelAdapter::returning(Some(
            json!({ "answer": "Fever, cough..." }),
        )));
        let flow = HealthQuestionFlow::new(mock.clone(), MODEL);

        let answer = flow
            .run(&QuestionRequest::new("What are flu symptoms?"))
            .await
            .unwrap();

        assert_eq!(answer.answer, "Fever, cough...");
        let calls = mock.calls();
        assert!(calls[0].prompt_text().ends_with("Question: What are flu symptoms?"));
        assert_eq!(calls[0].safety, SafetySetting::permissive_policy());
    }

    #[tokio::test]
    async fn test_missing_or_blank_answer_is_an_error() {
        for output in [None, Some(json!({})), Some(json!({ "answer": "  " }))] {
            let flow = HealthQuestionFlow::new(Arc::new(MockModelAdapter::returning(output)), MODEL);
            let err = flow
                .run(&QuestionRequest::new("What are flu symptoms?"))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::EmptyOutput(_)));
            assert!(err.to_string().contains("rephrasing"));
        }
    }

    #[tokio::test]
    async fn test_blank_question_never_calls_model() {
        let mock = Arc::new(MockModelAdapter::returning(Some(json!({ "answer": "x" }))));
        let flow = HealthQuestionFlow::new(mock.clone(), MODEL);

        assert!(matches!(
            flow.run(&QuestionRequest::new(" ")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            flow.run(&QuestionRequest::default()).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_unavailable_is_not_masked() {
        let mock = Arc::new(MockModelAdapter::failing(DomainError::ModelUnavailable(
            "HTTP request failed: connection refused".to_string(),
        )));
        let flow = HealthQuestionFlow::new(mock, MODEL);

        let err = flow
            .run(&QuestionRequest::new("What are flu symptoms?"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let err = answer_health_question(
            Arc::new(UnconfiguredModelAdapter::new()),
            MODEL,
            &QuestionRequest::new("What are flu symptoms?"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Unconfigured(_)));
    }
}
