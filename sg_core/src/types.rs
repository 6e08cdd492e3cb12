use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use strum::{Display, EnumString};

/// One entry in a similarity index: the original text, its embedding, and
/// free-form metadata. Immutable once created except for removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorEntry {
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl VectorEntry {
    pub fn new(
        text: impl Into<String>,
        vector: Vec<f32>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            text: text.into(),
            vector,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Convenience constructor for an entry with a single metadata field.
    pub fn with_field(
        text: impl Into<String>,
        vector: Vec<f32>,
        key: &str,
        value: impl Into<String>,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(key.to_string(), serde_json::Value::String(value.into()));
        Self::new(text, vector, metadata)
    }

    /// Returns a metadata field as a string slice, if present and a string.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// Supported generation/embedding backends. Routing is a closed enumeration
/// so an invalid route is rejected at configuration time, not mid-request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, Default,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Provider {
    #[default]
    Google,
    OpenAi,
    Mock,
}

/// One raw response from a generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub text: String,
    /// Self-reported confidence estimate in `[0, 1]`.
    pub confidence: f32,
    /// Estimated monetary cost of the call, in dollars.
    pub cost: f64,
    pub provider: Provider,
}

impl Generation {
    /// A zero-confidence placeholder used when a backend call fails in
    /// transit. The gateway degrades instead of crashing.
    pub fn placeholder(provider: Provider, reason: &str) -> Self {
        Self {
            text: format!("Generation unavailable: {reason}"),
            confidence: 0.0,
            cost: 0.0,
            provider,
        }
    }
}

/// Tuning knobs for a single generation call. `effort` selects the
/// provider-side quality tier; higher effort means slower, better-verified
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub temperature: f32,
    pub effort: u32,
}

/// One iteration of the adaptive loop. Produced fresh per attempt, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationAttempt {
    /// 1-based attempt counter.
    pub number: u32,
    pub temperature: f32,
    pub effort: u32,
    pub generation: Generation,
}

impl GenerationAttempt {
    pub fn confidence(&self) -> f32 {
        self.generation.confidence
    }

    pub fn cost(&self) -> f64 {
        self.generation.cost
    }
}

/// Terminal state of one adaptive-loop invocation.
///
/// `Succeeded` carries the first attempt that met the required confidence.
/// `Exhausted` is a normal outcome, not an error: the budget or the attempt
/// cap ran out first, and the highest-confidence attempt observed is
/// returned as a best-effort answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum GenerationOutcome {
    Succeeded(GenerationAttempt),
    Exhausted {
        best: Option<GenerationAttempt>,
        attempts: u32,
    },
}

impl GenerationOutcome {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// The attempt this outcome resolves to, if any call completed at all.
    pub fn attempt(&self) -> Option<&GenerationAttempt> {
        match self {
            Self::Succeeded(attempt) => Some(attempt),
            Self::Exhausted { best, .. } => best.as_ref(),
        }
    }
}

/// How the gateway treats a query that misses both the defense store and
/// the cache.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, Default,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum GatewayMode {
    /// One generation call, accepted unconditionally and cached.
    Single,
    /// Risk-aware escalation: required confidence derived from the risk
    /// score, bounded retries with cooling temperature and rising effort.
    #[default]
    Adaptive,
}

/// Advisory output of a risk classifier: a score in `[0, 1]` and a
/// human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: f32,
    pub reason: String,
}

impl RiskAssessment {
    pub fn low() -> Self {
        Self {
            score: 0.1,
            reason: "LOW: Standard query".to_string(),
        }
    }
}

/// The sole externally observable output of one gateway query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult {
    pub text: String,
    pub cached: bool,
    pub blocked: bool,
    pub reason: Option<String>,
    /// Confidence of the answer; 1.0 for cache hits, 0.0 for blocks.
    pub confidence: f32,
    /// Summed monetary cost of the generation attempts made for this query.
    pub cost: f64,
    #[serde(with = "optional_duration_ms", default)]
    pub latency: Option<Duration>,
}

impl GatewayResult {
    pub fn blocked(reason: String, latency: Duration) -> Self {
        Self {
            text: "Request blocked by semantic firewall.".to_string(),
            cached: false,
            blocked: true,
            reason: Some(reason),
            confidence: 0.0,
            cost: 0.0,
            latency: Some(latency),
        }
    }

    pub fn cached(text: String, latency: Duration) -> Self {
        Self {
            text,
            cached: true,
            blocked: false,
            reason: None,
            confidence: 1.0,
            cost: 0.0,
            latency: Some(latency),
        }
    }
}

/// Serialize `Option<Duration>` as milliseconds for stable wire output.
mod optional_duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        v.map(|d| d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let ms = Option::<u64>::deserialize(d)?;
        Ok(ms.map(Duration::from_millis))
    }
}
