//! Top-level orchestrator: one unified response per incoming query.

use crate::adaptive::{AdaptiveGenerationLoop, LoopConfig};
use crate::admission::{DutyCycleGate, NoGate};
use crate::risk::PatternRiskClassifier;
use crate::telemetry::GatewayTelemetry;
use config::SemgateConfig;
use errors::GatewayError;
use memory::{CacheStore, DefenseStore, MemorySnapshot, MemoryTelemetry};
use providers::{EmbeddingClient, GenerationClient};
use sg_core::traits::{AdmissionGate, RiskClassifier};
use sg_core::{GatewayMode, GatewayResult, GenerationOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Composes the defense store, the semantic cache, and the adaptive
/// generation loop behind a single `process` entry point.
///
/// Every call returns a structured [`GatewayResult`]; no error and no panic
/// crosses this boundary for normal traffic. Construction seeds the defense
/// store before the gateway can see a query.
pub struct Gateway {
    mode: GatewayMode,
    embedder: Arc<EmbeddingClient>,
    cache: CacheStore,
    defense: DefenseStore,
    generator: AdaptiveGenerationLoop,
    risk: Arc<dyn RiskClassifier>,
    high_risk_confidence: f32,
    base_confidence: f32,
    risk_escalation_threshold: f32,
    loop_config: LoopConfig,
    telemetry: Arc<GatewayTelemetry>,
}

impl Gateway {
    /// Builds a gateway entirely from configuration, including the remote
    /// clients. Fatal on missing credentials or invalid routes.
    pub async fn from_config(config: &SemgateConfig) -> Result<Self, GatewayError> {
        let embedder = Arc::new(providers::embedding_client(&config.providers)?);
        let generation = providers::generation_client(&config.providers)?;
        Self::assemble(config, embedder, generation).await
    }

    /// Builds a gateway around caller-supplied clients (tests inject
    /// deterministic services here).
    pub async fn assemble(
        config: &SemgateConfig,
        embedder: Arc<EmbeddingClient>,
        generation: GenerationClient,
    ) -> Result<Self, GatewayError> {
        let memory_telemetry = Arc::new(MemoryTelemetry::new());
        let telemetry = Arc::new(GatewayTelemetry::new());

        let cache = CacheStore::new(
            config.cache.similarity_threshold,
            config.cache.capacity,
            Arc::clone(&memory_telemetry),
        );
        let defense = DefenseStore::new(
            config.defense.similarity_threshold,
            Arc::clone(&embedder),
            memory_telemetry,
        );
        if config.defense.seed_builtin {
            // Vaccination before traffic: the store must know the threat
            // catalogue before the first query arrives.
            defense.seed().await;
        }

        let admission: Arc<dyn AdmissionGate> = if config.generation.admission.enabled {
            Arc::new(DutyCycleGate::new(
                Duration::from_millis(config.generation.admission.period_ms),
                config.generation.admission.window_ratio,
            ))
        } else {
            Arc::new(NoGate)
        };

        let loop_config = LoopConfig {
            max_attempts: config.generation.max_attempts,
            energy_budget: config.generation.energy_budget,
            failure_penalty: config.generation.failure_penalty,
            pause: Duration::from_millis(config.generation.attempt_pause_ms),
            ..LoopConfig::default()
        };
        let generator = AdaptiveGenerationLoop::new(
            Arc::new(generation),
            loop_config.clone(),
            admission,
            Arc::clone(&telemetry),
        );

        info!(mode = %config.generation.mode, "gateway ready");
        Ok(Self {
            mode: config.generation.mode,
            embedder,
            cache,
            defense,
            generator,
            risk: Arc::new(PatternRiskClassifier::new()),
            high_risk_confidence: config.generation.high_risk_confidence,
            base_confidence: config.generation.base_confidence,
            risk_escalation_threshold: config.generation.risk_escalation_threshold,
            loop_config,
            telemetry,
        })
    }

    /// Replaces the bundled pattern classifier with a custom one.
    pub fn with_risk_classifier(mut self, classifier: Arc<dyn RiskClassifier>) -> Self {
        self.risk = classifier;
        self
    }

    pub fn mode(&self) -> GatewayMode {
        self.mode
    }

    /// The sole public entry point for normal traffic.
    pub async fn process(&self, query: &str) -> GatewayResult {
        let start = Instant::now();
        debug!(query, "processing query");

        // 1. Embed. A transport failure yields the zero vector, which
        //    matches nothing and flows through to generation.
        let vector = self.embedder.embed(query).await;

        // 2. Defense check.
        let verdict = self.defense.check(&vector).await;
        if !verdict.is_safe {
            self.telemetry.record_query("blocked", start.elapsed());
            return GatewayResult::blocked(verdict.reason, start.elapsed());
        }

        // 3. Semantic cache.
        if let Some(text) = self.cache.lookup(&vector).await {
            self.telemetry.record_query("cached", start.elapsed());
            return GatewayResult::cached(text, start.elapsed());
        }

        // 4. Generation, per the configured mode.
        let (required_confidence, loop_config) = match self.mode {
            GatewayMode::Single => (
                0.0,
                LoopConfig {
                    max_attempts: Some(1),
                    pause: Duration::ZERO,
                    ..self.loop_config.clone()
                },
            ),
            GatewayMode::Adaptive => {
                let assessment = self.risk.assess(query);
                self.telemetry.record_risk_score(assessment.score);
                debug!(score = assessment.score, reason = %assessment.reason, "risk assessed");
                let required = if assessment.score > self.risk_escalation_threshold {
                    self.high_risk_confidence
                } else {
                    self.base_confidence
                };
                (required, self.loop_config.clone())
            }
        };

        let report = self
            .generator
            .run_with(query, required_confidence, &loop_config)
            .await;

        // 5. Memorize successful interactions only; failed attempts never
        //    reach the cache.
        match report.outcome {
            GenerationOutcome::Succeeded(attempt) => {
                self.cache
                    .record(query, vector, &attempt.generation.text)
                    .await;
                self.telemetry.record_query("generated", start.elapsed());
                GatewayResult {
                    text: attempt.generation.text,
                    cached: false,
                    blocked: false,
                    reason: None,
                    confidence: attempt.generation.confidence,
                    cost: report.total_cost,
                    latency: Some(start.elapsed()),
                }
            }
            GenerationOutcome::Exhausted { best, attempts } => {
                self.telemetry.record_query("exhausted", start.elapsed());
                let (text, confidence) = match best {
                    Some(attempt) => (attempt.generation.text, attempt.generation.confidence),
                    None => ("No response available: generation budget exhausted.".to_string(), 0.0),
                };
                GatewayResult {
                    text,
                    cached: false,
                    blocked: false,
                    reason: Some(format!(
                        "Confidence threshold unmet after {attempts} attempts; best effort returned"
                    )),
                    confidence,
                    cost: report.total_cost,
                    latency: Some(start.elapsed()),
                }
            }
        }
    }

    /// Administrative entry point: extends the threat catalogue. Not
    /// exposed to end users.
    pub async fn teach(&self, text: &str, label: &str) {
        self.defense.learn(text, label).await;
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    pub async fn defense_len(&self) -> usize {
        self.defense.len().await
    }

    /// Clones out both stores for persistence.
    pub async fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            cache: self.cache.export().await,
            defense: self.defense.export().await,
        }
    }

    /// Replaces both stores from a snapshot.
    pub async fn restore(&self, snapshot: MemorySnapshot) {
        self.cache.import(snapshot.cache).await;
        self.defense.import(snapshot.defense).await;
    }
}
