//! The unified escalating-attempt generation loop.
//!
//! Each iteration cools the sampling temperature and raises the effort
//! tier; the loop ends at the first attempt meeting the required
//! confidence, or when the energy budget or attempt cap runs out.

use crate::budget::EnergyBudget;
use crate::telemetry::GatewayTelemetry;
use providers::GenerationClient;
use sg_core::traits::AdmissionGate;
use sg_core::{GenerationAttempt, GenerationOutcome, GenerationRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cooling schedule: attempt `n` samples at `max(0.1, 1.0 - 0.25·n)`.
pub fn temperature_for_attempt(attempt: u32) -> f32 {
    (1.0 - attempt as f32 * 0.25).max(0.1)
}

/// Effort schedule: attempt `n` runs at tier `1 + n`.
pub fn effort_for_attempt(attempt: u32) -> u32 {
    1 + attempt
}

/// Loop tuning. `max_attempts = None` leaves the energy budget as the only
/// stop condition.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub max_attempts: Option<u32>,
    pub energy_budget: f64,
    pub failure_penalty: f64,
    /// Pause between attempts, for rate courtesy toward the backend. A
    /// policy knob, not a correctness requirement.
    pub pause: Duration,
    /// Temperature schedule; defaults to [`temperature_for_attempt`].
    pub cooling: fn(u32) -> f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_attempts: Some(4),
            energy_budget: 100.0,
            failure_penalty: 2.0,
            pause: Duration::ZERO,
            cooling: temperature_for_attempt,
        }
    }
}

/// Everything one loop invocation produced, beyond the outcome itself:
/// the summed monetary cost of the attempts and the energy left over.
#[derive(Debug, Clone)]
pub struct LoopReport {
    pub outcome: GenerationOutcome,
    pub total_cost: f64,
    pub energy_remaining: f64,
}

/// Drives repeated calls against one [`GenerationClient`]. Pure with
/// respect to its inputs apart from budget mutation and the client calls
/// themselves; a fresh [`EnergyBudget`] is created per invocation.
pub struct AdaptiveGenerationLoop {
    client: Arc<GenerationClient>,
    config: LoopConfig,
    admission: Arc<dyn AdmissionGate>,
    telemetry: Arc<GatewayTelemetry>,
}

impl AdaptiveGenerationLoop {
    pub fn new(
        client: Arc<GenerationClient>,
        config: LoopConfig,
        admission: Arc<dyn AdmissionGate>,
        telemetry: Arc<GatewayTelemetry>,
    ) -> Self {
        Self {
            client,
            config,
            admission,
            telemetry,
        }
    }

    /// Runs the loop with the configured tuning.
    pub async fn run(&self, prompt: &str, required_confidence: f32) -> LoopReport {
        self.run_with(prompt, required_confidence, &self.config).await
    }

    /// Runs the loop with per-call tuning (the single-call gateway mode
    /// reuses this with a cap of 1).
    pub async fn run_with(
        &self,
        prompt: &str,
        required_confidence: f32,
        config: &LoopConfig,
    ) -> LoopReport {
        let mut budget = EnergyBudget::new(config.energy_budget);
        let mut best: Option<GenerationAttempt> = None;
        let mut total_cost = 0.0;
        let mut attempts = 0_u32;

        let may_continue = |attempts: u32, budget: &EnergyBudget| {
            config.max_attempts.is_none_or(|cap| attempts < cap) && !budget.is_exhausted()
        };

        while may_continue(attempts, &budget) {
            attempts += 1;
            self.admission.admit().await;

            let request = GenerationRequest {
                temperature: (config.cooling)(attempts),
                effort: effort_for_attempt(attempts),
            };
            let generation = self.client.generate(prompt, &request).await;

            budget.debit(generation.cost);
            total_cost += generation.cost;

            let attempt = GenerationAttempt {
                number: attempts,
                temperature: request.temperature,
                effort: request.effort,
                generation,
            };
            debug!(
                attempt = attempt.number,
                temperature = attempt.temperature,
                effort = attempt.effort,
                confidence = attempt.confidence(),
                energy = budget.remaining(),
                "generation attempt"
            );
            self.telemetry.record_attempt(&attempt);

            if attempt.confidence() >= required_confidence {
                self.telemetry
                    .record_energy_spent(config.energy_budget - budget.remaining());
                return LoopReport {
                    outcome: GenerationOutcome::Succeeded(attempt),
                    total_cost,
                    energy_remaining: budget.remaining(),
                };
            }

            budget.penalize(config.failure_penalty);

            // Strictly-greater comparison keeps the earliest of equally
            // confident attempts.
            if best
                .as_ref()
                .is_none_or(|current| attempt.confidence() > current.confidence())
            {
                best = Some(attempt);
            }

            if may_continue(attempts, &budget) && !config.pause.is_zero() {
                tokio::time::sleep(config.pause).await;
            }
        }

        debug!(attempts, best_confidence = best.as_ref().map(GenerationAttempt::confidence),
            "loop exhausted below required confidence");
        self.telemetry
            .record_energy_spent(config.energy_budget - budget.remaining());
        LoopReport {
            outcome: GenerationOutcome::Exhausted { best, attempts },
            total_cost,
            energy_remaining: budget.remaining(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::NoGate;
    use providers::{GenerationClient, MockGenerationService};

    fn harness(mock: MockGenerationService, config: LoopConfig) -> AdaptiveGenerationLoop {
        AdaptiveGenerationLoop::new(
            Arc::new(GenerationClient::mock(mock)),
            config,
            Arc::new(NoGate),
            Arc::new(GatewayTelemetry::new()),
        )
    }

    #[test]
    fn schedules_cool_and_escalate() {
        assert_eq!(temperature_for_attempt(1), 0.75);
        assert_eq!(temperature_for_attempt(2), 0.5);
        assert_eq!(temperature_for_attempt(3), 0.25);
        assert_eq!(temperature_for_attempt(4), 0.1);
        assert_eq!(temperature_for_attempt(10), 0.1);

        assert_eq!(effort_for_attempt(1), 2);
        assert_eq!(effort_for_attempt(4), 5);
    }

    #[tokio::test]
    async fn succeeds_on_the_first_attempt_meeting_the_bar() {
        let mock = MockGenerationService::new()
            .respond_confidence(0.2, 1.0)
            .respond_confidence(0.5, 1.0)
            .respond_confidence(0.96, 1.0)
            .respond_confidence(0.99, 1.0);
        let handle = mock.clone();
        let generator = harness(mock, LoopConfig::default());

        let report = generator.run("prompt", 0.95).await;

        let GenerationOutcome::Succeeded(attempt) = report.outcome else {
            panic!("expected success, got {:?}", report.outcome);
        };
        assert_eq!(attempt.number, 3);
        assert_eq!(attempt.temperature, 0.25);
        assert_eq!(attempt.confidence(), 0.96);
        // The queued 4th response was never requested.
        assert_eq!(handle.call_count(), 3);
        assert_eq!(report.total_cost, 3.0);
    }

    #[tokio::test]
    async fn exhausts_after_one_attempt_when_the_budget_collapses() {
        let mock = MockGenerationService::new()
            .respond_confidence(0.3, 3.0)
            .respond_confidence(0.3, 3.0);
        let handle = mock.clone();
        let generator = harness(
            mock,
            LoopConfig {
                max_attempts: Some(10),
                energy_budget: 4.0,
                failure_penalty: 2.0,
                ..LoopConfig::default()
            },
        );

        let report = generator.run("prompt", 0.95).await;

        let GenerationOutcome::Exhausted { best, attempts } = report.outcome else {
            panic!("expected exhaustion, got {:?}", report.outcome);
        };
        // 4.0 - 3.0 (cost) - 2.0 (penalty) goes negative after one try.
        assert_eq!(attempts, 1);
        assert_eq!(handle.call_count(), 1);
        assert_eq!(best.expect("one attempt was made").confidence(), 0.3);
        assert!(report.energy_remaining < 0.0);
    }

    #[tokio::test]
    async fn exhaustion_returns_the_highest_confidence_attempt() {
        let mock = MockGenerationService::new()
            .respond_confidence(0.4, 0.1)
            .respond_confidence(0.8, 0.1)
            .respond_confidence(0.6, 0.1);
        let generator = harness(
            mock,
            LoopConfig {
                max_attempts: Some(3),
                ..LoopConfig::default()
            },
        );

        let report = generator.run("prompt", 0.99).await;

        let GenerationOutcome::Exhausted { best, attempts } = report.outcome else {
            panic!("expected exhaustion");
        };
        assert_eq!(attempts, 3);
        assert_eq!(best.expect("attempts were made").confidence(), 0.8);
    }

    #[tokio::test]
    async fn unbounded_mode_stops_on_budget_alone() {
        // Every attempt costs 1.0 + 2.0 penalty; a 9.0 budget admits three.
        let mock = MockGenerationService::new()
            .respond_confidence(0.1, 1.0)
            .respond_confidence(0.1, 1.0)
            .respond_confidence(0.1, 1.0)
            .respond_confidence(0.1, 1.0);
        let handle = mock.clone();
        let generator = harness(
            mock,
            LoopConfig {
                max_attempts: None,
                energy_budget: 9.0,
                failure_penalty: 2.0,
                ..LoopConfig::default()
            },
        );

        let report = generator.run("prompt", 0.95).await;

        let GenerationOutcome::Exhausted { attempts, .. } = report.outcome else {
            panic!("expected exhaustion");
        };
        assert_eq!(attempts, 3);
        assert_eq!(handle.call_count(), 3);
    }

    #[tokio::test]
    async fn a_custom_cooling_schedule_is_honored() {
        let mock = MockGenerationService::new().respond_confidence(0.99, 0.1);
        let generator = harness(
            mock,
            LoopConfig {
                cooling: |_| 0.42,
                ..LoopConfig::default()
            },
        );

        let report = generator.run("prompt", 0.9).await;
        let GenerationOutcome::Succeeded(attempt) = report.outcome else {
            panic!("expected success");
        };
        assert_eq!(attempt.temperature, 0.42);
    }

    #[tokio::test]
    async fn a_cap_of_one_accepts_anything_at_zero_required_confidence() {
        let mock = MockGenerationService::new().respond_confidence(0.05, 0.2);
        let handle = mock.clone();
        let generator = harness(mock, LoopConfig::default());

        let report = generator
            .run_with(
                "prompt",
                0.0,
                &LoopConfig {
                    max_attempts: Some(1),
                    pause: Duration::ZERO,
                    ..LoopConfig::default()
                },
            )
            .await;

        assert!(report.outcome.is_succeeded());
        assert_eq!(handle.call_count(), 1);
    }
}
