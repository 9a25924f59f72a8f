//! Prompt templates and rendering.
//!
//! Templates are plain text resources embedded at compile time. Placeholders:
//! - `{{name}}`: replaced with the value of `name`, verbatim
//! - `{{media name}}`: the value of `name` is attached as a media part at that position

use crate::ports::PromptPart;
use tracing::warn;

/// Instruction template for the document analysis flow.
pub const DOCUMENT_ANALYSIS_PROMPT: PromptTemplate = PromptTemplate::new(
    "analyzeMedicalDocumentsPrompt",
    include_str!("prompts/analyze_medical_document.txt"),
);

/// Instruction template for the health Q&A flow.
pub const HEALTH_QUESTION_PROMPT: PromptTemplate = PromptTemplate::new(
    "answerHealthQuestionsPrompt",
    include_str!("prompts/answer_health_question.txt"),
);

/// Disclaimer the document analysis prompt asks the model to reproduce unmodified.
pub const REPORT_DISCLAIMER: &str = "This is an AI-generated analysis for informational purposes only and is not a substitute for professional medical advice. Always consult with a qualified healthcare provider for any medical concerns.";

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    name: &'static str,
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Render the template with `vars`. Pure and deterministic.
    ///
    /// Adjacent text is merged into a single part. Unknown placeholders render as
    /// nothing; an unterminated `{{` is kept as literal text.
    pub fn render(&self, vars: &[(&str, &str)]) -> Vec<PromptPart> {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = self.source.trim_end();

        while let Some(start) = rest.find("{{") {
            text.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                text.push_str(&rest[start..]);
                rest = "";
                break;
            };
            let tag = after[..end].trim();
            rest = &after[end + 2..];

            if let Some(name) = tag.strip_prefix("media ") {
                match lookup(vars, name.trim()) {
                    Some(url) => {
                        if !text.is_empty() {
                            parts.push(PromptPart::Text(std::mem::take(&mut text)));
                        }
                        parts.push(PromptPart::Media {
                            url: url.to_string(),
                        });
                    }
                    None => warn!(template = self.name, placeholder = tag, "no value for media placeholder"),
                }
            } else {
                match lookup(vars, tag) {
                    Some(value) => text.push_str(value),
                    None => warn!(template = self.name, placeholder = tag, "no value for placeholder"),
                }
            }
        }

        text.push_str(rest);
        if !text.is_empty() {
            parts.push(PromptPart::Text(text));
        }
        parts
    }
}

fn lookup<'a>(vars: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    vars.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}
