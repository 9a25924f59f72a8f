//! Implements ReportStorePort. Saves each analysis report as a Markdown file.
//! One file per report: {reports_dir}/analysis_{slug}_{timestamp}.md, with a
//! `_{n}` suffix when a report for the same document already exists at that second.

use crate::domain::{DocumentAnalysisResponse, DomainError};
use crate::ports::{ReportMeta, ReportStorePort};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Suffixes tried before giving up on a free file name.
const MAX_NAME_ATTEMPTS: u32 = 100;

pub struct FsReportStore {
    reports_dir: PathBuf,
}

impl FsReportStore {
    pub fn new(reports_dir: impl AsRef<Path>) -> Self {
        Self {
            reports_dir: reports_dir.as_ref().to_path_buf(),
        }
    }

    fn report_path(&self, source_name: &str, at: DateTime<Utc>, attempt: u32) -> PathBuf {
        let stem = format!("analysis_{}_{}", slug(source_name), at.format("%Y%m%dT%H%M%SZ"));
        let name = if attempt <= 1 {
            format!("{}.md", stem)
        } else {
            format!("{}_{}.md", stem, attempt)
        };
        self.reports_dir.join(name)
    }

    fn render(meta: &ReportMeta, response: &DocumentAnalysisResponse, at: DateTime<Utc>) -> String {
        let mut md = String::new();
        md.push_str(&format!("# Document Analysis: {}\n\n", meta.source_name));
        md.push_str(&format!(
            "**Analyzed:** {}\n\n",
            at.format("%Y-%m-%d %H:%M UTC")
        ));
        md.push_str("**Your context:**\n\n");
        for line in meta.user_context.lines() {
            md.push_str(&format!("> {}\n", line));
        }
        md.push_str("\n---\n\n");
        md.push_str(&response.report);
        if !response.report.ends_with('\n') {
            md.push('\n');
        }
        md
    }
}

/// Keep ASCII alphanumerics; everything else collapses to `_`.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait::async_trait]
impl ReportStorePort for FsReportStore {
    async fn save_report(
        &self,
        meta: &ReportMeta,
        response: &DocumentAnalysisResponse,
    ) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.reports_dir)
            .await
            .map_err(|e| DomainError::ReportStore(format!("Failed to create reports dir: {}", e)))?;

        let now = Utc::now();
        let content = Self::render(meta, response, now);

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let path = self.report_path(&meta.source_name, now, attempt);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "report name taken, trying next suffix");
                    continue;
                }
                Err(e) => {
                    return Err(DomainError::ReportStore(format!("Failed to create report: {}", e)));
                }
            };

            file.write_all(content.as_bytes())
                .await
                .map_err(|e| DomainError::ReportStore(format!("Failed to write report: {}", e)))?;
            file.flush()
                .await
                .map_err(|e| DomainError::ReportStore(format!("Failed to write report: {}", e)))?;

            info!(path = %path.display(), "report saved");
            return Ok(path);
        }

        Err(DomainError::ReportStore(format!(
            "No free report name for {} after {} attempts",
            meta.source_name, MAX_NAME_ATTEMPTS
        )))
    }
}
