use metrics::{counter, histogram};
use sg_core::GenerationAttempt;
use std::time::Duration;

/// Metrics emission for the gateway and the adaptive loop, over the
/// `metrics` facade.
#[derive(Debug, Default)]
pub struct GatewayTelemetry {
    _phantom: std::marker::PhantomData<()>,
}

impl GatewayTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self, attempt: &GenerationAttempt) {
        counter!("semgate_generation_attempts_total").increment(1);
        histogram!("semgate_attempt_confidence").record(f64::from(attempt.confidence()));
        histogram!("semgate_attempt_cost_dollars").record(attempt.cost());
    }

    pub fn record_energy_spent(&self, energy: f64) {
        histogram!("semgate_energy_spent").record(energy);
    }

    pub fn record_query(&self, outcome: &'static str, latency: Duration) {
        counter!("semgate_queries_total", "outcome" => outcome).increment(1);
        histogram!("semgate_query_latency_seconds", "outcome" => outcome)
            .record(latency.as_secs_f64());
    }

    pub fn record_risk_score(&self, score: f32) {
        histogram!("semgate_risk_score").record(f64::from(score));
    }
}
