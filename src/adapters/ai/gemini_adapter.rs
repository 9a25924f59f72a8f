//! Google Generative Language (Gemini) adapter for the AI flows.
//!
//! Implements `ModelPort` over the `generateContent` REST endpoint with
//! structured JSON output, safety settings and inline document data.

use crate::domain::{DomainError, EncodedDocument, SafetySetting};
use crate::ports::{ModelPort, ModelRequest, PromptPart};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default REST base for the Generative Language API.
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini adapter. One HTTP request per call, no retry.
pub struct GeminiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter.
    ///
    /// # Arguments
    /// * `api_url` - REST base (e.g., "https://generativelanguage.googleapis.com/v1beta")
    /// * `api_key` - Google AI API key
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// `{api_url}/models/{model}:generateContent`. A `googleai/` provider prefix is dropped.
    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("googleai/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.api_url, model)
    }

    fn build_body(request: &ModelRequest) -> GenerateRequest<'_> {
        let parts = request
            .prompt
            .iter()
            .map(|part| match part {
                PromptPart::Text(text) => Part::Text { text: text.clone() },
                PromptPart::Media { url } => media_part(url),
            })
            .collect();

        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            safety_settings: &request.safety,
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.output_schema,
            },
        }
    }

    /// Pull the structured output out of a response. `None` when the model gave nothing usable.
    fn parse_output(response: GenerateResponse) -> Option<Value> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            warn!(block_reason = %reason, "prompt blocked by model service");
            return None;
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            warn!("model returned no candidates");
            return None;
        };
        let finish_reason = candidate.finish_reason.unwrap_or_default();

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            warn!(finish_reason = %finish_reason, "model returned empty content");
            return None;
        }

        let clean_json = Self::sanitize_json(&text);
        match serde_json::from_str(&clean_json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, json = %clean_json.chars().take(200).collect::<String>(), "JSON parse failed");
                None
            }
        }
    }

    /// Sanitize JSON text from the model.
    ///
    /// Models sometimes wrap JSON in markdown code blocks even in JSON mode. This strips them.
    fn sanitize_json(raw_text: &str) -> String {
        let trimmed = raw_text.trim();

        if trimmed.starts_with("```") {
            let without_prefix = trimmed
                .strip_prefix("```json")
                .or_else(|| trimmed.strip_prefix("```"))
                .unwrap_or(trimmed);

            if let Some(end_idx) = without_prefix.rfind("```") {
                return without_prefix[..end_idx].trim().to_string();
            }
            return without_prefix.trim().to_string();
        }

        if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
            if start < end {
                return trimmed[start..=end].to_string();
            }
        }

        trimmed.to_string()
    }
}

/// `data:` URIs go inline; anything else is passed as a file URI for the service to fetch.
fn media_part(url: &str) -> Part {
    let doc = EncodedDocument::new(url);
    match doc.split() {
        Some((mime_type, data)) => Part::Inline {
            inline_data: InlineData {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            },
        },
        None => Part::File {
            file_data: FileData {
                file_uri: url.to_string(),
            },
        },
    }
}

/// generateContent request structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content>,
    safety_settings: &'a [SafetySetting],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    file_uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

/// generateContent response structure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[async_trait::async_trait]
impl ModelPort for GeminiAdapter {
    async fn generate(&self, request: &ModelRequest) -> Result<Option<Value>, DomainError> {
        info!(
            model = %request.model,
            parts = request.prompt.len(),
            "sending prompt to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(|e| DomainError::ModelUnavailable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Gemini API returned error");
            return Err(DomainError::ModelUnavailable(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            DomainError::ModelUnavailable(format!("Failed to parse API response: {}", e))
        })?;

        let output = Self::parse_output(body);
        debug!(has_output = output.is_some(), "received Gemini response");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> Option<Value> {
        GeminiAdapter::parse_output(serde_json::from_value(body).unwrap())
    }

    fn sample_request() -> ModelRequest {
        ModelRequest {
            model: "googleai/gemini-pro-vision".to_string(),
            prompt: vec![
                PromptPart::Text("Context: cough\n".to_string()),
                PromptPart::Media {
                    url: "data:application/pdf;base64,AAAA".to_string(),
                },
                PromptPart::Text("\nWrite a report.".to_string()),
            ],
            output_schema: json!({ "type": "OBJECT", "required": ["report"] }),
            safety: SafetySetting::permissive_policy(),
        }
    }

    #[test]
    fn test_endpoint_strips_provider_prefix() {
        let adapter = GeminiAdapter::new(format!("{}/", DEFAULT_GEMINI_API_URL), "k".into());
        assert_eq!(
            adapter.endpoint("googleai/gemini-pro-vision"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro-vision:generateContent"
        );
        assert_eq!(
            adapter.endpoint("gemini-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = sample_request();
        let body = serde_json::to_value(GeminiAdapter::build_body(&request)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0], json!({ "text": "Context: cough\n" }));
        assert_eq!(
            parts[1],
            json!({ "inlineData": { "mimeType": "application/pdf", "data": "AAAA" } })
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][3]["category"], "HARM_CATEGORY_SEXUALLY_EXPLICIT");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["required"], json!(["report"]));
    }

    #[test]
    fn test_non_data_uri_becomes_file_part() {
        let part = serde_json::to_value(media_part("https://example.com/scan.png")).unwrap();
        assert_eq!(
            part,
            json!({ "fileData": { "fileUri": "https://example.com/scan.png" } })
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_model_unavailable() {
        let adapter = GeminiAdapter::new("http://127.0.0.1:1".to_string(), "k".to_string());
        let err = adapter.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, DomainError::ModelUnavailable(_)));
    }

    #[test]
    fn test_parse_output_ok() {
        let out = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"report\": \"### Analysis Summary\"}" }] },
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(out, Some(json!({ "report": "### Analysis Summary" })));
    }

    #[test]
    fn test_parse_output_absent() {
        assert_eq!(parse(json!({})), None);
        assert_eq!(
            parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
            None
        );
        assert_eq!(
            parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] })),
            None
        );
        assert_eq!(
            parse(json!({ "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }] })),
            None
        );
    }

    #[test]
    fn test_sanitize_json_clean() {
        let input = r#"{"answer": "test"}"#;
        assert_eq!(GeminiAdapter::sanitize_json(input), input);
    }

    #[test]
    fn test_sanitize_json_markdown() {
        let input = "```json\n{\"answer\": \"test\"}\n```";
        assert_eq!(GeminiAdapter::sanitize_json(input), r#"{"answer": "test"}"#);
    }

    #[test]
    fn test_sanitize_json_with_text() {
        let input = "Here is the answer:\n{\"answer\": \"test\"}";
        assert_eq!(GeminiAdapter::sanitize_json(input), r#"{"answer": "test"}"#);
    }
}
