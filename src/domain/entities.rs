//! Domain entities. Request/response value objects for the two AI flows.
//!
//! No HTTP/provider types here — adapters map these onto the wire.

use serde::{Deserialize, Serialize};

/// Caller input for the document analysis flow.
///
/// Fields are optional on the wire so that a missing field surfaces as a
/// `ValidationError` rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysisRequest {
    /// Encoded document payload: `data:<media-type>;base64,<payload>`.
    #[serde(default, alias = "medicalDocuments")]
    pub document: Option<String>,
    /// What the user wants to know about the document.
    #[serde(default, alias = "userDescription")]
    pub user_context: Option<String>,
}

impl DocumentAnalysisRequest {
    pub fn new(document: impl Into<String>, user_context: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            user_context: Some(user_context.into()),
        }
    }
}

/// Markdown report produced by the document analysis flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysisResponse {
    pub report: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
}

impl QuestionRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub answer: String,
}

/// Opaque encoded document. Never decoded by the flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedDocument(String);

impl EncodedDocument {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a `data:<media-type>;base64,<payload>` string into its media type and payload.
    ///
    /// Returns `None` for anything else (plain URLs, non-base64 data URIs).
    /// The payload is not decoded; the model boundary decides whether it is usable.
    pub fn split(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let media_type = header.strip_suffix(";base64")?;
        if media_type.is_empty() {
            return None;
        }
        Some((media_type, payload))
    }
}

/// Document analysis input after validation. Only this reaches the prompt composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDocumentAnalysis {
    pub document: EncodedDocument,
    pub user_context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuestion {
    pub question: String,
}

/// Harm categories understood by the model service's content filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::DangerousContent,
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
    ];
}

/// Filtering threshold, from least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// The fixed policy sent with every flow call: every category at `BLOCK_NONE`.
    pub fn permissive_policy() -> Vec<SafetySetting> {
        HarmCategory::ALL
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: HarmBlockThreshold::BlockNone,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_data_uri() {
        let doc = EncodedDocument::new("data:application/pdf;base64,AAAA");
        assert_eq!(doc.split(), Some(("application/pdf", "AAAA")));
    }

    #[test]
    fn test_split_rejects_non_base64() {
        assert_eq!(EncodedDocument::new("data:text/plain,hello").split(), None);
        assert_eq!(EncodedDocument::new("https://example.com/a.pdf").split(), None);
        assert_eq!(EncodedDocument::new("data:;base64,AAAA").split(), None);
    }

    #[test]
    fn test_request_accepts_portal_field_names() {
        let req: DocumentAnalysisRequest = serde_json::from_str(
            r#"{"medicalDocuments": "data:image/png;base64,AA==", "userDescription": "rash"}"#,
        )
        .unwrap();
        assert_eq!(req.document.as_deref(), Some("data:image/png;base64,AA=="));
        assert_eq!(req.user_context.as_deref(), Some("rash"));
    }

    #[test]
    fn test_safety_setting_wire_names() {
        let json = serde_json::to_value(SafetySetting::permissive_policy()).unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({
                "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                "threshold": "BLOCK_NONE"
            })
        );
        assert_eq!(json.as_array().unwrap().len(), 4);
    }
}
