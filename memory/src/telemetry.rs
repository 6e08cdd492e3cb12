use metrics::{counter, gauge};

/// Metrics emission for the similarity stores, over the `metrics` facade.
/// Created once and shared via `Arc`; a process without an installed
/// recorder pays only a no-op call.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    _phantom: std::marker::PhantomData<()>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self, score: f32) {
        counter!("semgate_cache_hits_total").increment(1);
        gauge!("semgate_cache_last_hit_score").set(f64::from(score));
    }

    pub fn record_cache_miss(&self) {
        counter!("semgate_cache_misses_total").increment(1);
    }

    pub fn record_cache_size(&self, entries: usize) {
        gauge!("semgate_cache_entries").set(entries as f64);
    }

    pub fn record_eviction(&self) {
        counter!("semgate_cache_evictions_total").increment(1);
    }

    pub fn record_block(&self, label: &str, score: f32) {
        counter!("semgate_defense_blocks_total", "attack" => label.to_string()).increment(1);
        gauge!("semgate_defense_last_block_score").set(f64::from(score));
    }

    pub fn record_defense_pass(&self) {
        counter!("semgate_defense_passes_total").increment(1);
    }

    pub fn record_signature_learned(&self, label: &str) {
        counter!("semgate_defense_signatures_total", "attack" => label.to_string()).increment(1);
    }

    pub fn record_snapshot(&self, operation: &str, entries: usize) {
        counter!("semgate_snapshot_operations_total", "operation" => operation.to_string())
            .increment(1);
        gauge!("semgate_snapshot_entries").set(entries as f64);
    }
}
