//! # Semgate Memory
//!
//! In-memory similarity stores for the semantic gateway:
//!
//! - [`SimilarityIndex`]: an ordered collection of vector entries with
//!   linear cosine search and FIFO eviction
//! - [`CacheStore`]: the semantic response cache (bounded, evicting)
//! - [`DefenseStore`]: the curated attack-signature store (unbounded,
//!   append-only, seeded before traffic)
//! - [`SnapshotFile`]: best-effort JSON persistence with an explicit
//!   load/flush lifecycle
//!
//! Stores support concurrent reads and serialized writes via a single
//! `tokio::sync::RwLock` each, which is sufficient at the intended scale of
//! hundreds to low thousands of entries with O(n) scans.

pub mod cache;
pub mod defense;
pub mod index;
pub mod snapshot;
pub mod telemetry;

pub use cache::CacheStore;
pub use defense::{DefenseStore, DefenseVerdict};
pub use index::{SearchHit, SimilarityIndex, cosine_similarity};
pub use snapshot::{MemorySnapshot, SnapshotFile};
pub use telemetry::MemoryTelemetry;
