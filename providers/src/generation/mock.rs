//! Scripted generation service for tests and offline runs.

use async_trait::async_trait;
use errors::ProviderError;
use sg_core::traits::GenerationService;
use sg_core::{Generation, GenerationRequest, Provider};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Scripted {
    Respond(Generation),
    Fail,
}

/// Returns scripted responses in order, then a deterministic default.
///
/// Clones share the script and the call counter, so a test can keep a
/// handle while the service is owned by a client, and assert that blocked
/// or cached queries never reach generation at all.
#[derive(Clone, Default)]
pub struct MockGenerationService {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<AtomicUsize>,
}

impl MockGenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a full scripted response.
    pub fn respond_with(self, generation: Generation) -> Self {
        self.script
            .lock()
            .expect("mock script poisoned")
            .push_back(Scripted::Respond(generation));
        self
    }

    /// Queues a response with the given confidence and cost; text is
    /// derived from the confidence so assertions can tell attempts apart.
    pub fn respond_confidence(self, confidence: f32, cost: f64) -> Self {
        let generation = Generation {
            text: format!("scripted answer (confidence {confidence})"),
            confidence,
            cost,
            provider: Provider::Mock,
        };
        self.respond_with(generation)
    }

    /// Queues a transport failure.
    pub fn failing_next(self) -> Self {
        self.script
            .lock()
            .expect("mock script poisoned")
            .push_back(Scripted::Fail);
        self
    }

    /// Number of `generate` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    type Error = ProviderError;

    async fn generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().expect("mock script poisoned").pop_front();
        match next {
            Some(Scripted::Respond(generation)) => Ok(generation),
            Some(Scripted::Fail) => Err(ProviderError::Transport {
                provider: "mock".to_string(),
                reason: "programmed failure".to_string(),
            }),
            None => Ok(Generation {
                text: format!(
                    "Mock response to: {} (effort {})",
                    prompt.chars().take(40).collect::<String>(),
                    request.effort
                ),
                confidence: 0.5,
                cost: 0.0,
                provider: Provider::Mock,
            }),
        }
    }
}
