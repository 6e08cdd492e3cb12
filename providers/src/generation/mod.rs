//! Generation backends and the routed, fail-soft client the adaptive loop
//! consumes.

pub mod gemini;
pub mod mock;

#[cfg(feature = "openai-provider")]
pub mod openai;

pub use gemini::GeminiGenerationService;
pub use mock::MockGenerationService;

#[cfg(feature = "openai-provider")]
pub use openai::OpenAiGenerationService;

use errors::ProviderError;
use metrics::counter;
use sg_core::traits::GenerationService;
use sg_core::{Generation, GenerationRequest, Provider};
use tracing::warn;

enum GenerationBackend {
    Gemini(GeminiGenerationService),
    Mock(MockGenerationService),
    #[cfg(feature = "openai-provider")]
    OpenAi(OpenAiGenerationService),
}

/// The generation capability as the adaptive loop sees it.
///
/// The route is fixed at construction (a closed enum resolved by the
/// factory), so every call goes to a backend known to be configured. A
/// transport failure degrades to a zero-confidence placeholder: the loop
/// treats it like any other below-threshold attempt and either retries or
/// exhausts, instead of crashing the gateway.
pub struct GenerationClient {
    provider: Provider,
    backend: GenerationBackend,
}

impl GenerationClient {
    pub fn gemini(service: GeminiGenerationService) -> Self {
        Self {
            provider: Provider::Google,
            backend: GenerationBackend::Gemini(service),
        }
    }

    pub fn mock(service: MockGenerationService) -> Self {
        Self {
            provider: Provider::Mock,
            backend: GenerationBackend::Mock(service),
        }
    }

    #[cfg(feature = "openai-provider")]
    pub fn openai(service: OpenAiGenerationService) -> Self {
        Self {
            provider: Provider::OpenAi,
            backend: GenerationBackend::OpenAi(service),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Generates a response, degrading to a placeholder on backend failure.
    pub async fn generate(&self, prompt: &str, request: &GenerationRequest) -> Generation {
        let result: Result<Generation, ProviderError> = match &self.backend {
            GenerationBackend::Gemini(service) => service.generate(prompt, request).await,
            GenerationBackend::Mock(service) => service.generate(prompt, request).await,
            #[cfg(feature = "openai-provider")]
            GenerationBackend::OpenAi(service) => service.generate(prompt, request).await,
        };

        match result {
            Ok(generation) => generation,
            Err(err) => {
                warn!(error = %err, provider = %self.provider, "generation failed; degrading");
                counter!("semgate_generation_failures_total", "provider" => self.provider.to_string())
                    .increment(1);
                Generation::placeholder(self.provider, &err.to_string())
            }
        }
    }
}

/// Heuristic confidence shared by the remote backends: cooler sampling
/// reads as higher confidence, floored at 0.5.
pub(crate) fn heuristic_confidence(temperature: f32) -> f32 {
    (1.0 - temperature * 0.20).max(0.5)
}

/// Length-based cost estimate at roughly four characters per token.
pub(crate) fn estimate_cost(
    prompt: &str,
    completion: &str,
    input_rate: f64,
    output_rate: f64,
) -> f64 {
    let input_tokens = prompt.len() as f64 / 4.0;
    let output_tokens = completion.len() as f64 / 4.0;
    input_tokens * input_rate + output_tokens * output_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_cools_with_temperature_but_never_below_half() {
        assert!((heuristic_confidence(0.1) - 0.98).abs() < 1e-6);
        assert!((heuristic_confidence(1.0) - 0.8).abs() < 1e-6);
        assert_eq!(heuristic_confidence(5.0), 0.5);
    }

    #[tokio::test]
    async fn backend_error_degrades_to_placeholder() {
        let mock = MockGenerationService::new().failing_next();
        let client = GenerationClient::mock(mock);

        let generation = client
            .generate(
                "hello",
                &GenerationRequest {
                    temperature: 0.5,
                    effort: 2,
                },
            )
            .await;

        assert_eq!(generation.confidence, 0.0);
        assert_eq!(generation.cost, 0.0);
        assert!(generation.text.contains("unavailable"));
    }
}
