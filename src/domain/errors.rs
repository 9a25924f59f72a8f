//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Every message is shown to end users as-is.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("AI features are not configured: {0}")]
    Unconfigured(String),

    #[error("The AI service could not be reached: {0}")]
    ModelUnavailable(String),

    /// The model answered but gave nothing usable. The message carries the user guidance.
    #[error("{0}")]
    EmptyOutput(String),

    #[error("Could not read the document: {0}")]
    Document(String),

    #[error("Could not save the report: {0}")]
    ReportStore(String),

    /// Terminal prompt failed or was cancelled.
    #[error("Input error: {0}")]
    Input(String),
}

/// A request field failed its structural check. Raised before any model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    Missing,
    Blank,
    /// Wrong JSON type or an unparsable body.
    Malformed(String),
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::Missing,
        }
    }

    pub fn blank(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::Blank,
        }
    }

    pub fn malformed(field: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self {
            field: field.into(),
            kind: ValidationErrorKind::Malformed(detail.to_string()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::Missing => write!(f, "The field '{}' is required.", self.field),
            ValidationErrorKind::Blank => {
                write!(f, "The field '{}' must not be empty.", self.field)
            }
            ValidationErrorKind::Malformed(detail) => {
                write!(f, "The field '{}' is invalid: {}.", self.field, detail)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
