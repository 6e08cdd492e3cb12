//! Semantic response cache: a bounded similarity index keyed by query
//! embedding, holding prior responses in entry metadata.

use crate::index::SimilarityIndex;
use crate::telemetry::MemoryTelemetry;
use sg_core::VectorEntry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Metadata key under which the cached response text is stored.
const RESPONSE_KEY: &str = "response";

/// Similarity-keyed cache of (query, response) pairs.
///
/// Reads take the lock shared; writes (insert + eviction) take it
/// exclusively, preserving FIFO order under concurrent queries. Entries are
/// only ever recorded for threshold-met generations; failed attempts never
/// reach this store.
pub struct CacheStore {
    index: RwLock<SimilarityIndex>,
    threshold: f32,
    telemetry: Arc<MemoryTelemetry>,
}

impl CacheStore {
    pub fn new(threshold: f32, capacity: usize, telemetry: Arc<MemoryTelemetry>) -> Self {
        Self {
            index: RwLock::new(SimilarityIndex::bounded(capacity)),
            threshold,
            telemetry,
        }
    }

    /// Returns the cached response for the most similar prior query, if its
    /// similarity reaches the configured threshold.
    pub async fn lookup(&self, query_vector: &[f32]) -> Option<String> {
        let index = self.index.read().await;
        match index.search(query_vector, self.threshold) {
            Some(hit) => {
                debug!(score = hit.score, query = %hit.entry.text, "cache hit");
                self.telemetry.record_cache_hit(hit.score);
                hit.entry.field(RESPONSE_KEY).map(str::to_string)
            }
            None => {
                self.telemetry.record_cache_miss();
                None
            }
        }
    }

    /// Stores a successful (query, response) interaction, evicting the
    /// oldest entry when over capacity.
    pub async fn record(&self, query: &str, query_vector: Vec<f32>, response: &str) {
        let entry = VectorEntry::with_field(query, query_vector, RESPONSE_KEY, response);
        let mut index = self.index.write().await;
        if let Some(evicted) = index.insert(entry) {
            debug!(query = %evicted.text, "evicted oldest cache entry");
            self.telemetry.record_eviction();
        }
        self.telemetry.record_cache_size(index.len());
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    /// Clones out all entries for snapshotting.
    pub async fn export(&self) -> Vec<VectorEntry> {
        self.index.read().await.entries()
    }

    /// Replaces the cache contents from a snapshot.
    pub async fn import(&self, entries: Vec<VectorEntry>) {
        let mut index = self.index.write().await;
        index.replace(entries);
        self.telemetry.record_cache_size(index.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(threshold: f32, capacity: usize) -> CacheStore {
        CacheStore::new(threshold, capacity, Arc::new(MemoryTelemetry::new()))
    }

    #[tokio::test]
    async fn lookup_returns_recorded_response_for_similar_vector() {
        let cache = store(0.92, 10);
        cache
            .record("What is the capital of France?", vec![1.0, 0.0], "Paris.")
            .await;

        // Identical vector: similarity 1.0.
        let hit = cache.lookup(&[1.0, 0.0]).await;
        assert_eq!(hit.as_deref(), Some("Paris."));

        // A nearby but sub-threshold vector misses.
        let miss = cache.lookup(&[0.5, 0.9]).await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn capacity_is_never_exceeded_and_oldest_goes_first() {
        let cache = store(0.9, 2);
        cache.record("q1", vec![1.0, 0.0], "r1").await;
        cache.record("q2", vec![0.0, 1.0], "r2").await;
        cache.record("q3", vec![-1.0, 0.0], "r3").await;

        assert_eq!(cache.len().await, 2);
        // q1 was evicted; its vector no longer matches.
        assert!(cache.lookup(&[1.0, 0.0]).await.is_none());
        assert_eq!(cache.lookup(&[0.0, 1.0]).await.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn export_import_round_trips_contents() {
        let cache = store(0.9, 10);
        cache.record("q", vec![1.0, 0.0], "r").await;

        let entries = cache.export().await;
        let other = store(0.9, 10);
        other.import(entries.clone()).await;

        assert_eq!(other.export().await, entries);
        assert_eq!(other.lookup(&[1.0, 0.0]).await.as_deref(), Some("r"));
    }
}
