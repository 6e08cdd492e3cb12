//! # Semgate Providers
//!
//! Wrappers over the remote embedding and generation capabilities.
//!
//! Backends are a closed set ([`sg_core::Provider`]): routing is resolved
//! at construction time, so an invalid or unconfigured route is a fatal
//! configuration error instead of a mid-request surprise. Transport
//! failures, by contrast, are recovered locally: the gateway-facing
//! [`EmbeddingClient`] and [`GenerationClient`] never raise — they degrade
//! to a zero vector or a zero-confidence placeholder and log the failure.

pub mod embedding;
pub mod factory;
pub mod generation;

pub use embedding::{EmbeddingClient, GeminiEmbeddingService, MockEmbeddingService};
pub use factory::{embedding_client, generation_client};
pub use generation::{GeminiGenerationService, GenerationClient, MockGenerationService};
