//! Report store outbound port. Persist document analysis reports outside the flow.

use crate::domain::{DocumentAnalysisResponse, DomainError};
use std::path::PathBuf;

/// Metadata written alongside a saved report.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Name of the analyzed file, as shown to the user.
    pub source_name: String,
    pub user_context: String,
}

/// Port for saving analysis reports.
///
/// Implemented by adapters (e.g. filesystem). The flows never call it; the
/// front-end does after a successful analysis.
#[async_trait::async_trait]
pub trait ReportStorePort: Send + Sync {
    /// Save a report and return where it was written.
    ///
    /// # Errors
    /// Returns `DomainError::ReportStore` if the write fails.
    async fn save_report(
        &self,
        meta: &ReportMeta,
        response: &DocumentAnalysisResponse,
    ) -> Result<PathBuf, DomainError>;
}
