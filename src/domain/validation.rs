//! Input validation for the flow contracts. Pure functions, no I/O.
//!
//! Only structure is checked here: presence, string type, non-blank text.
//! The encoded document stays opaque; the model boundary rejects unusable payloads.

use super::entities::{
    DocumentAnalysisRequest, EncodedDocument, QuestionRequest, ValidDocumentAnalysis,
    ValidQuestion,
};
use super::errors::ValidationError;
use serde_json::{Map, Value};

pub fn validate_document_analysis(
    req: &DocumentAnalysisRequest,
) -> Result<ValidDocumentAnalysis, ValidationError> {
    let document = match req.document.as_deref() {
        None => return Err(ValidationError::missing("document")),
        Some("") => return Err(ValidationError::blank("document")),
        Some(raw) => EncodedDocument::new(raw),
    };
    let user_context = required_text(req.user_context.as_deref(), "userContext")?;
    Ok(ValidDocumentAnalysis {
        document,
        user_context: user_context.to_string(),
    })
}

pub fn validate_question(req: &QuestionRequest) -> Result<ValidQuestion, ValidationError> {
    let question = required_text(req.question.as_deref(), "question")?;
    Ok(ValidQuestion {
        question: question.to_string(),
    })
}

/// Value is kept verbatim; blank-ness is judged on the trimmed text.
fn required_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(ValidationError::missing(field)),
        Some(s) if s.trim().is_empty() => Err(ValidationError::blank(field)),
        Some(s) => Ok(s),
    }
}

impl DocumentAnalysisRequest {
    /// Parses a JSON body. Wrong field types are reported as validation errors,
    /// not as serde errors. Presence is left to `validate_document_analysis`.
    pub fn from_json(body: &str) -> Result<Self, ValidationError> {
        let obj = parse_object(body)?;
        Ok(Self {
            document: optional_string(&obj, &["document", "medicalDocuments"])?,
            user_context: optional_string(&obj, &["userContext", "userDescription"])?,
        })
    }
}

impl QuestionRequest {
    pub fn from_json(body: &str) -> Result<Self, ValidationError> {
        let obj = parse_object(body)?;
        Ok(Self {
            question: optional_string(&obj, &["question"])?,
        })
    }
}

fn parse_object(body: &str) -> Result<Map<String, Value>, ValidationError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(ValidationError::malformed("request", "expected a JSON object")),
        Err(e) => Err(ValidationError::malformed("request", e)),
    }
}

/// Looks up the first present name; `null` counts as absent.
fn optional_string(
    obj: &Map<String, Value>,
    names: &[&str],
) -> Result<Option<String>, ValidationError> {
    for name in names {
        match obj.get(*name) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(_) => return Err(ValidationError::malformed(*name, "expected a string")),
        }
    }
    Ok(None)
}
