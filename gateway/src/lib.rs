//! # Semgate Gateway
//!
//! The orchestration layer of the semantic gateway: one `process` call per
//! query runs embed → defense check → cache lookup → adaptive generation →
//! cache write, and always returns a structured [`sg_core::GatewayResult`].
//!
//! The adaptive loop escalates effort and cools temperature across
//! attempts, gated by a per-session energy budget and a required-confidence
//! bar; exhaustion is a normal terminal state reported as best effort, not
//! an error.

pub mod admission;
pub mod adaptive;
pub mod budget;
pub mod gateway;
pub mod risk;
pub mod telemetry;

pub use adaptive::{AdaptiveGenerationLoop, LoopConfig, LoopReport};
pub use admission::{DutyCycleGate, NoGate};
pub use budget::EnergyBudget;
pub use gateway::Gateway;
pub use risk::PatternRiskClassifier;
pub use telemetry::GatewayTelemetry;
