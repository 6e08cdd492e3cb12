//! Linear-scan similarity index with FIFO eviction.
//!
//! Brute force is a deliberate choice: at hundreds to low thousands of
//! entries a full scan is faster and simpler than maintaining an ANN
//! structure, and it makes search results exactly reproducible.

use sg_core::VectorEntry;
use std::collections::VecDeque;
use tracing::trace;

/// Cosine similarity of two vectors.
///
/// Returns `0.0` when either vector is empty, when lengths differ, or when
/// either norm is zero. That default is a fail-safe, not a numeric error: a
/// zero vector (the embedding client's transport-failure fallback) scores
/// 0.0 against everything and therefore never produces a cache hit or a
/// defense block.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// A successful search: the best-matching entry (cloned out of the index)
/// and its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub score: f32,
    pub entry: VectorEntry,
}

/// An ordered sequence of vector entries; insertion order is recency order.
///
/// All vectors in one index are expected to share the same fixed length
/// (they come from a single embedding client with a fixed dimension);
/// entries that violate this simply score 0.0 in every search.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    entries: VecDeque<VectorEntry>,
    capacity: Option<usize>,
}

impl SimilarityIndex {
    /// An unbounded index. Used for curated signature sets that are managed
    /// explicitly rather than evicted.
    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
        }
    }

    /// A capacity-bounded index with oldest-first eviction.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry; if the index exceeds its capacity, evicts and
    /// returns the oldest entry.
    pub fn insert(&mut self, entry: VectorEntry) -> Option<VectorEntry> {
        self.entries.push_back(entry);
        match self.capacity {
            Some(capacity) if self.entries.len() > capacity => self.entries.pop_front(),
            _ => None,
        }
    }

    /// Scans every stored vector and returns the maximum-similarity entry,
    /// provided the maximum reaches `threshold`.
    ///
    /// Ties resolve to the earliest-inserted entry (the running maximum is
    /// only replaced by a strictly greater score), keeping results
    /// reproducible across runs with identical inputs.
    pub fn search(&self, query: &[f32], threshold: f32) -> Option<SearchHit> {
        let mut best_score = 0.0_f32;
        let mut best: Option<&VectorEntry> = None;

        for entry in &self.entries {
            let score = cosine_similarity(query, &entry.vector);
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        trace!(best_score, threshold, scanned = self.entries.len(), "index scan");

        match best {
            Some(entry) if best_score >= threshold => Some(SearchHit {
                score: best_score,
                entry: entry.clone(),
            }),
            _ => None,
        }
    }

    /// Clones out all entries in insertion order (for snapshots).
    pub fn entries(&self) -> Vec<VectorEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Replaces the contents with `entries`, preserving their order and
    /// re-applying the capacity bound.
    pub fn replace(&mut self, entries: Vec<VectorEntry>) {
        self.entries = entries.into();
        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(text: &str, vector: Vec<f32>) -> VectorEntry {
        VectorEntry::new(text, vector, Default::default())
    }

    #[test]
    fn cosine_of_identical_unit_vectors_is_one() {
        let v = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-4);
    }

    #[test]
    fn cosine_fails_safe_on_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn search_returns_true_maximum() {
        let mut index = SimilarityIndex::unbounded();
        index.insert(entry("far", vec![0.0, 1.0]));
        index.insert(entry("near", vec![1.0, 0.05]));
        index.insert(entry("off", vec![-1.0, 0.0]));

        let hit = index.search(&[1.0, 0.0], 0.5).expect("should match");
        assert_eq!(hit.entry.text, "near");
        assert!(hit.score > 0.99);
    }

    #[test]
    fn search_below_threshold_is_none() {
        let mut index = SimilarityIndex::unbounded();
        index.insert(entry("a", vec![1.0, 1.0]));
        assert!(index.search(&[1.0, 0.0], 0.99).is_none());
    }

    #[test]
    fn ties_resolve_to_earliest_inserted() {
        let mut index = SimilarityIndex::unbounded();
        index.insert(entry("first", vec![2.0, 0.0]));
        index.insert(entry("second", vec![4.0, 0.0]));

        // Both entries are colinear with the query: identical similarity.
        let hit = index.search(&[1.0, 0.0], 0.9).expect("should match");
        assert_eq!(hit.entry.text, "first");
    }

    #[test]
    fn bounded_index_evicts_oldest_first() {
        let mut index = SimilarityIndex::bounded(2);
        assert!(index.insert(entry("one", vec![1.0, 0.0])).is_none());
        assert!(index.insert(entry("two", vec![0.0, 1.0])).is_none());

        let evicted = index.insert(entry("three", vec![1.0, 1.0]));
        assert_eq!(evicted.expect("evicts oldest").text, "one");
        assert_eq!(index.len(), 2);

        let evicted = index.insert(entry("four", vec![1.0, -1.0]));
        assert_eq!(evicted.expect("evicts oldest").text, "two");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn replace_reapplies_capacity_bound() {
        let mut index = SimilarityIndex::bounded(2);
        index.replace(vec![
            entry("a", vec![1.0]),
            entry("b", vec![1.0]),
            entry("c", vec![1.0]),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].text, "b");
    }

    proptest! {
        #[test]
        fn cosine_is_symmetric(
            a in proptest::collection::vec(-10.0_f32..10.0, 1..32),
            b in proptest::collection::vec(-10.0_f32..10.0, 1..32),
        ) {
            prop_assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-5);
        }

        #[test]
        fn cosine_self_similarity_is_one(
            a in proptest::collection::vec(-10.0_f32..10.0, 1..32)
                .prop_filter("non-zero norm", |v| v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-2)
        ) {
            prop_assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-4);
        }
    }
}
