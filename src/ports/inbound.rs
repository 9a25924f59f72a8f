//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI drives the AI flows.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run the interactive menu until the user exits.
    async fn run(&self) -> Result<(), DomainError>;

    /// Ask one health question and print the answer.
    async fn run_question(&self) -> Result<(), DomainError>;

    /// Pick a document, describe the concern, print (and optionally save) the report.
    async fn run_document_analysis(&self) -> Result<(), DomainError>;
}
