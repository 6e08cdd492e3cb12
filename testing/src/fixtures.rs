use config::SemgateConfig;
use providers::{MockEmbeddingService, MockGenerationService};

/// Embedding dimension used by the offline fixtures. Small enough to write
/// vectors by hand, large enough that the builtin defense catalogue plus a
/// few test texts stay mutually orthogonal.
pub const FIXTURE_DIMENSION: usize = 16;

/// A configuration tuned for tests: mock providers, a small embedding
/// dimension, no inter-attempt pause, and the reference thresholds
/// otherwise untouched.
pub fn offline_config() -> SemgateConfig {
    let mut config = SemgateConfig::default();
    config.providers.embedding_dimension = FIXTURE_DIMENSION;
    config.generation.attempt_pause_ms = 0;
    config
}

/// A deterministic embedder of the fixture dimension.
pub fn static_embedder() -> MockEmbeddingService {
    MockEmbeddingService::new(FIXTURE_DIMENSION)
}

/// A generation service scripted with `(confidence, cost)` pairs, drained
/// in order.
pub fn scripted_generation(script: &[(f32, f64)]) -> MockGenerationService {
    script.iter().fold(
        MockGenerationService::new(),
        |service, (confidence, cost)| service.respond_confidence(*confidence, *cost),
    )
}
