//! Embedding backends and the fail-safe client the gateway consumes.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiEmbeddingService;
pub use mock::MockEmbeddingService;

use errors::ProviderError;
use metrics::counter;
use sg_core::traits::EmbeddingService;
use tracing::warn;

enum EmbeddingBackend {
    Gemini(GeminiEmbeddingService),
    Mock(MockEmbeddingService),
}

/// The embedding capability as the gateway sees it: text in, fixed-length
/// vector out, infallible.
///
/// Any transport or parse error from the underlying backend degrades to a
/// zero vector of the configured dimension. A zero vector scores 0.0
/// against every stored vector, so a failed embedding can neither hit the
/// cache nor trip the defense store — the query simply proceeds to
/// generation.
pub struct EmbeddingClient {
    backend: EmbeddingBackend,
}

impl EmbeddingClient {
    pub fn gemini(service: GeminiEmbeddingService) -> Self {
        Self {
            backend: EmbeddingBackend::Gemini(service),
        }
    }

    pub fn mock(service: MockEmbeddingService) -> Self {
        Self {
            backend: EmbeddingBackend::Mock(service),
        }
    }

    pub fn dimension(&self) -> usize {
        match &self.backend {
            EmbeddingBackend::Gemini(service) => service.dimension(),
            EmbeddingBackend::Mock(service) => service.dimension(),
        }
    }

    /// Embeds `text`, returning the zero vector on any backend failure.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        let result: Result<Vec<f32>, ProviderError> = match &self.backend {
            EmbeddingBackend::Gemini(service) => service.embed(text).await,
            EmbeddingBackend::Mock(service) => service.embed(text).await,
        };

        match result {
            Ok(vector) => vector,
            Err(err) => {
                warn!(error = %err, "embedding failed; falling back to zero vector");
                counter!("semgate_embedding_failures_total").increment(1);
                vec![0.0; self.dimension()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transport_failure_degrades_to_zero_vector() {
        let mock = MockEmbeddingService::new(8).failing_on("boom");
        let client = EmbeddingClient::mock(mock);

        let vector = client.embed("boom").await;
        assert_eq!(vector, vec![0.0; 8]);

        // Other texts still embed normally.
        let ok = client.embed("fine").await;
        assert_eq!(ok.len(), 8);
        assert!(ok.iter().any(|component| *component != 0.0));
    }
}
