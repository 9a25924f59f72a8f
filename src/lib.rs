//! health-portal-ai: Typed AI flows (document analysis, health Q&A) with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
