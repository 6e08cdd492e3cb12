//! # Semgate Errors
//!
//! Error taxonomy for the semantic gateway, shared across the workspace.
//!
//! The taxonomy mirrors the recovery strategy: transport failures are
//! recovered locally with fail-safe defaults and never reach these types at
//! the gateway boundary; budget exhaustion and defense blocks are normal
//! outcomes, not errors; configuration problems are fatal at construction.

use thiserror::Error;

/// Errors from the similarity index and its store specializations.
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Vector dimension mismatch: index holds {expected}, entry has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Snapshot I/O failed at {path}: {reason}")]
    SnapshotIo { path: String, reason: String },

    #[error("Snapshot corrupted at {path}: {reason}")]
    SnapshotCorrupted { path: String, reason: String },
}

/// Errors from embedding/generation provider calls.
///
/// These surface inside the `providers` crate; the gateway-facing wrappers
/// translate them into fail-safe defaults (zero vector, placeholder
/// generation) before they can cross the public boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport failure talking to {provider}: {reason}")]
    Transport { provider: String, reason: String },

    #[error("Unexpected response shape from {provider}: {reason}")]
    Malformed { provider: String, reason: String },

    #[error("Rate limited by {provider}: retry after {retry_after}s")]
    RateLimited { provider: String, retry_after: u64 },
}

/// Configuration errors: always fatal, surfaced at load or construction,
/// never silently defaulted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required credential: {credential}")]
    MissingCredential { credential: String },

    #[error("Invalid routing target: {route}")]
    InvalidRoute { route: String },

    #[error("Route {route} requires a backend that was not compiled in: {feature}")]
    RouteNotCompiled { route: String, feature: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to read config file {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    FileParse { path: String, reason: String },
}

/// Gateway construction errors. `process` itself never fails; these occur
/// only while wiring services together.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Defense seeding failed: {reason}")]
    SeedingFailed { reason: String },
}
