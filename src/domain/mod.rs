//! Core domain layer. No external I/O dependencies.
//!
//! Flow contracts, validation rules and errors live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod validation;

pub use entities::{
    DocumentAnalysisRequest, DocumentAnalysisResponse, EncodedDocument, HarmBlockThreshold,
    HarmCategory, QuestionAnswer, QuestionRequest, SafetySetting, ValidDocumentAnalysis,
    ValidQuestion,
};
pub use errors::{DomainError, ValidationError, ValidationErrorKind};
pub use validation::{validate_document_analysis, validate_question};
