//! Implements InputPort. Inquire-based interactive prompts over the two AI flows.

use super::progress::with_spinner;
use crate::adapters::persistence::load_document;
use crate::domain::{DocumentAnalysisRequest, DomainError, QuestionRequest};
use crate::ports::{InputPort, ReportMeta, ReportStorePort};
use crate::usecases::{DocumentAnalysisFlow, HealthQuestionFlow};
use async_trait::async_trait;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, Select, Text};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Suggested questions offered before free-text entry.
pub const QUICK_QUESTIONS: &[&str] = &[
    "What are common symptoms of the flu?",
    "How can I improve my sleep quality?",
    "What are some healthy lunch ideas?",
    "Tell me about the benefits of regular exercise.",
];

const CUSTOM_QUESTION: &str = "Ask something else...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    AskQuestion,
    AnalyzeDocument,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 3] = [MenuItem::AskQuestion, MenuItem::AnalyzeDocument, MenuItem::Exit];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MenuItem::AskQuestion => "Ask a health question",
            MenuItem::AnalyzeDocument => "Analyze a medical document",
            MenuItem::Exit => "Exit",
        };
        f.write_str(s)
    }
}

/// Apply the neon prompt theme to all subsequent inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

fn input_err(e: InquireError) -> DomainError {
    DomainError::Input(e.to_string())
}

fn is_cancel(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    documents: Arc<DocumentAnalysisFlow>,
    questions: Arc<HealthQuestionFlow>,
    reports: Arc<dyn ReportStorePort>,
}

impl TuiInputPort {
    pub fn new(
        documents: Arc<DocumentAnalysisFlow>,
        questions: Arc<HealthQuestionFlow>,
        reports: Arc<dyn ReportStorePort>,
    ) -> Self {
        Self {
            documents,
            questions,
            reports,
        }
    }

    fn prompt_question() -> Result<String, InquireError> {
        let mut options: Vec<&str> = QUICK_QUESTIONS.to_vec();
        options.push(CUSTOM_QUESTION);
        let picked = Select::new("How can I help you today?", options).prompt()?;
        if picked == CUSTOM_QUESTION {
            Text::new("Your question:").prompt()
        } else {
            Ok(picked.to_string())
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = match Select::new("What would you like to do?", MenuItem::ALL.to_vec()).prompt() {
                Ok(choice) => choice,
                Err(e) if is_cancel(&e) => break,
                Err(e) => return Err(input_err(e)),
            };

            let outcome = match choice {
                MenuItem::AskQuestion => self.run_question().await,
                MenuItem::AnalyzeDocument => self.run_document_analysis().await,
                MenuItem::Exit => break,
            };
            match outcome {
                Ok(()) => {}
                // Esc inside a sub-menu returns to the main menu.
                Err(DomainError::Input(msg)) => info!(reason = %msg, "prompt cancelled"),
                Err(e) => return Err(e),
            }
        }
        println!("Goodbye. Take care!");
        Ok(())
    }

    async fn run_question(&self) -> Result<(), DomainError> {
        let question = Self::prompt_question().map_err(input_err)?;
        let request = QuestionRequest::new(question);

        let result = with_spinner("Thinking...", self.questions.run(&request)).await;
        match result {
            Ok(answer) => println!("\n{}\n", answer.answer),
            Err(e) => println!("\nFailed to get answer: {}\n", e),
        }
        Ok(())
    }

    async fn run_document_analysis(&self) -> Result<(), DomainError> {
        let path = Text::new("Path to the medical document:")
            .with_help_message("pdf, doc, docx, txt, jpg, jpeg, png, heic, heif")
            .prompt()
            .map_err(input_err)?;
        let document = match load_document(&PathBuf::from(path.trim())).await {
            Ok(doc) => doc,
            Err(e) => {
                println!("\n{}\n", e);
                return Ok(());
            }
        };
        println!(
            "Type: {}, Size: {:.1} KB",
            document.media_type,
            document.size_bytes as f64 / 1024.0
        );

        let context = Text::new("Describe your symptoms, history, or questions about this document:")
            .prompt()
            .map_err(input_err)?;
        let request = DocumentAnalysisRequest::new(document.data_uri, context.clone());

        let result = with_spinner("Analyzing document...", self.documents.run(&request)).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                println!("\nFailed to analyze document: {}\n", e);
                return Ok(());
            }
        };
        println!("\n{}\n", response.report);

        let save = Confirm::new("Save this report as Markdown?")
            .with_default(true)
            .prompt()
            .map_err(input_err)?;
        if save {
            let meta = ReportMeta {
                source_name: document.name,
                user_context: context,
            };
            match self.reports.save_report(&meta, &response).await {
                Ok(path) => println!("Report saved to {}\n", path.display()),
                Err(e) => println!("{}\n", e),
            }
        }
        Ok(())
    }
}
