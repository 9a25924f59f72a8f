//! Filesystem adapters: reading documents for upload, saving analysis reports.

pub mod document_loader;
pub mod fs_report_store;

pub use document_loader::{load_document, LoadedDocument};
pub use fs_report_store::FsReportStore;
