//! Service traits at the seams of the gateway.

use crate::types::{Generation, GenerationRequest, RiskAssessment};
use async_trait::async_trait;

/// Remote embedding capability: text in, fixed-length vector out.
///
/// Implementations report their vector dimension up front so indexes can
/// enforce that all stored vectors agree on length.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    type Error;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    fn dimension(&self) -> usize;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Self::Error> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

/// Remote generation capability: prompt plus tuning knobs in, generated
/// text with self-reported confidence and cost out.
#[async_trait]
pub trait GenerationService: Send + Sync {
    type Error;

    async fn generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, Self::Error>;
}

/// Advisory risk classifier. The bundled implementation is pattern-based;
/// any classifier satisfying this contract can replace it.
pub trait RiskClassifier: Send + Sync {
    fn assess(&self, query: &str) -> RiskAssessment;
}

/// Optional admission predicate awaited before each generation attempt.
///
/// This is a pacing/policy hook, not a correctness requirement; the default
/// implementation admits immediately.
#[async_trait]
pub trait AdmissionGate: Send + Sync {
    async fn admit(&self);
}
