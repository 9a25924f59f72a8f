//! AI adapter module. Implements ModelPort for the generative model service.
//!
//! Provides the Gemini adapter, a mock adapter for testing, and a stand-in for
//! when no credential is configured.

pub mod gemini_adapter;
pub mod mock_adapter;
pub mod unconfigured_adapter;

pub use gemini_adapter::{GeminiAdapter, DEFAULT_GEMINI_API_URL};
pub use mock_adapter::MockModelAdapter;
pub use unconfigured_adapter::UnconfiguredModelAdapter;
