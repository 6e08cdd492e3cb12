//! Deterministic in-process embedding service for tests and offline runs.

use async_trait::async_trait;
use errors::ProviderError;
use sg_core::traits::EmbeddingService;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maps each distinct text to a deterministic unit vector.
///
/// Unseen texts are assigned successive basis vectors (one-hot at the next
/// free dimension), so up to `dimension` distinct texts are mutually
/// orthogonal — similar enough to reality for cache/defense tests while
/// staying fully reproducible. Identical text always yields the identical
/// vector. Specific vectors (and failures) can be programmed explicitly;
/// clones share the assignment table.
#[derive(Clone)]
pub struct MockEmbeddingService {
    dimension: usize,
    assignments: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    failures: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingService {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            assignments: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pins `text` to an explicit vector.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.assignments
            .lock()
            .expect("mock assignments poisoned")
            .insert(text.to_string(), vector);
        self
    }

    /// Makes `embed(text)` fail with a transport error, for exercising the
    /// zero-vector fallback.
    pub fn failing_on(self, text: &str) -> Self {
        self.failures
            .lock()
            .expect("mock failures poisoned")
            .push(text.to_string());
        self
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    type Error = ProviderError;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        if self
            .failures
            .lock()
            .expect("mock failures poisoned")
            .iter()
            .any(|t| t == text)
        {
            return Err(ProviderError::Transport {
                provider: "mock".to_string(),
                reason: "programmed failure".to_string(),
            });
        }

        let mut assignments = self.assignments.lock().expect("mock assignments poisoned");
        if let Some(vector) = assignments.get(text) {
            return Ok(vector.clone());
        }

        let index = assignments.len() % self.dimension;
        let mut vector = vec![0.0; self.dimension];
        vector[index] = 1.0;
        assignments.insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_text_embeds_identically() {
        let mock = MockEmbeddingService::new(4);
        let first = mock.embed("hello").await.unwrap();
        let second = mock.embed("hello").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distinct_texts_are_orthogonal_up_to_dimension() {
        let mock = MockEmbeddingService::new(4);
        let a = mock.embed("a").await.unwrap();
        let b = mock.embed("b").await.unwrap();
        let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert_eq!(dot, 0.0);
    }

    #[tokio::test]
    async fn programmed_vectors_win_over_assignment() {
        let mock = MockEmbeddingService::new(3).with_vector("pinned", vec![0.5, 0.5, 0.0]);
        assert_eq!(mock.embed("pinned").await.unwrap(), vec![0.5, 0.5, 0.0]);
    }
}
