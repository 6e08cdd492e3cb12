//! # Semgate Core
//!
//! Shared types and traits for the Semgate semantic gateway.
//!
//! This crate provides:
//! - The data model shared across the workspace (vector entries, generation
//!   attempts, gateway results)
//! - Service traits for the remote embedding and generation capabilities
//! - The advisory risk-classifier and admission-gate seams

pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    GatewayMode, GatewayResult, Generation, GenerationAttempt, GenerationOutcome,
    GenerationRequest, Provider, RiskAssessment, VectorEntry,
};
