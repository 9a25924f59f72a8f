//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by UI/adapter into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;
pub mod report_store;

pub use inbound::InputPort;
pub use outbound::{ModelPort, ModelRequest, PromptPart};
pub use report_store::{ReportMeta, ReportStorePort};
