//! Admission predicates awaited before each generation attempt.

use async_trait::async_trait;
use sg_core::traits::AdmissionGate;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Admits every attempt immediately. The default.
pub struct NoGate;

#[async_trait]
impl AdmissionGate for NoGate {
    async fn admit(&self) {}
}

/// Admits attempts only during a window at the start of each fixed cycle,
/// sleeping until the next window instead of spinning.
///
/// This paces attempts against a wall-clock beat; deployments that do not
/// need paced admission should leave it disabled.
pub struct DutyCycleGate {
    period: Duration,
    window: Duration,
}

impl DutyCycleGate {
    /// `window_ratio` is the admitted fraction of each cycle, clamped to
    /// `(0, 1]`.
    pub fn new(period: Duration, window_ratio: f64) -> Self {
        let ratio = window_ratio.clamp(0.01, 1.0);
        Self {
            period,
            window: period.mul_f64(ratio),
        }
    }

    fn position_in_cycle(&self) -> Duration {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        let period_ms = self.period.as_millis().max(1);
        Duration::from_millis((since_epoch.as_millis() % period_ms) as u64)
    }
}

#[async_trait]
impl AdmissionGate for DutyCycleGate {
    async fn admit(&self) {
        let position = self.position_in_cycle();
        if position <= self.window {
            return;
        }
        tokio::time::sleep(self.period - position).await;
    }
}
