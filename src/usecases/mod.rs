//! Application use cases. The AI flows, orchestrated via ports.

pub mod document_analysis;
pub mod flow;
pub mod health_qa;
pub mod prompt;

pub use document_analysis::{analyze_medical_document, DocumentAnalysisFlow};
pub use flow::FlowState;
pub use health_qa::{answer_health_question, HealthQuestionFlow};
