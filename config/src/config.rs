//! Configuration structures.
//!
//! All structures use serde for round-tripping and `validator` for range
//! checks; `Default` impls carry the reference operating values so a bare
//! `SemgateConfig::default()` is a working offline configuration (mock
//! providers) and a production file only needs to override what differs.

use errors::ConfigError;
use serde::{Deserialize, Serialize};
use sg_core::{GatewayMode, Provider};
use std::path::PathBuf;
use validator::Validate;

/// Top-level configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SemgateConfig {
    /// Remote backend settings and routing.
    #[validate(nested)]
    pub providers: ProviderSettings,

    /// Semantic cache tuning.
    #[validate(nested)]
    pub cache: CacheSettings,

    /// Vector defense tuning.
    #[validate(nested)]
    pub defense: DefenseSettings,

    /// Adaptive generation loop tuning.
    #[validate(nested)]
    pub generation: GenerationSettings,

    /// Optional snapshot persistence.
    pub snapshot: SnapshotSettings,
}

impl SemgateConfig {
    /// Runs `validator` checks plus the cross-field rules that the derive
    /// cannot express, converting failures into fatal `ConfigError`s.
    pub fn validate_strict(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|err| ConfigError::InvalidValue {
            field: "config".to_string(),
            reason: err.to_string(),
        })?;

        if self.providers.embedding_provider == Provider::OpenAi {
            // Embedding is served by Google or the mock; generation is the
            // surface that routes across all providers.
            return Err(ConfigError::InvalidRoute {
                route: format!("embedding via {}", self.providers.embedding_provider),
            });
        }

        Ok(())
    }
}

/// Remote backend credentials, models, and routing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderSettings {
    /// Backend used for generation.
    pub default_route: Provider,

    /// Backend used for embeddings (`google` or `mock`).
    pub embedding_provider: Provider,

    /// Fixed embedding vector length. The zero-vector fail-safe and the
    /// similarity stores all assume this dimension.
    #[validate(range(min = 1))]
    pub embedding_dimension: usize,

    #[validate(nested)]
    pub google: GoogleSettings,

    #[validate(nested)]
    pub openai: OpenAiSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            default_route: Provider::Mock,
            embedding_provider: Provider::Mock,
            embedding_dimension: 768,
            google: GoogleSettings::default(),
            openai: OpenAiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GoogleSettings {
    /// API key; required when any route points at Google.
    pub api_key: String,

    /// Generation model for ordinary effort tiers.
    #[validate(length(min = 1))]
    pub model: String,

    /// Optional higher-quality model used at elevated effort tiers.
    pub pro_model: Option<String>,

    /// Embedding model.
    #[validate(length(min = 1))]
    pub embedding_model: String,

    /// API base URL; overridable for tests.
    #[validate(length(min = 1))]
    pub base_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
            pro_model: None,
            embedding_model: "text-embedding-004".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiSettings {
    /// API key; required when any route points at OpenAI.
    pub api_key: String,

    #[validate(length(min = 1))]
    pub model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Semantic cache tuning.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    /// Minimum cosine similarity for a cache hit.
    #[validate(range(min = 0.0, max = 1.0))]
    pub similarity_threshold: f32,

    /// Maximum entries before oldest-first eviction.
    #[validate(range(min = 1))]
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.92,
            capacity: 1000,
        }
    }
}

/// Vector defense tuning.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DefenseSettings {
    /// Minimum cosine similarity to a known attack signature that blocks a
    /// query.
    #[validate(range(min = 0.0, max = 1.0))]
    pub similarity_threshold: f32,

    /// Install the built-in signature catalogue at start-up.
    pub seed_builtin: bool,
}

impl Default for DefenseSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            seed_builtin: true,
        }
    }
}

/// Adaptive generation loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    /// Gateway behavior for uncached, safe queries.
    pub mode: GatewayMode,

    /// Per-session energy allowance consumed by attempt costs and failure
    /// penalties.
    #[validate(range(min = 0.000001))]
    pub energy_budget: f64,

    /// Energy debited for each attempt that misses the confidence bar.
    #[validate(range(min = 0.0))]
    pub failure_penalty: f64,

    /// Hard attempt cap; `None` leaves the budget as the only stop.
    pub max_attempts: Option<u32>,

    /// Pause between attempts (rate courtesy; a policy knob, not a
    /// correctness requirement).
    pub attempt_pause_ms: u64,

    /// Required confidence for queries whose risk score exceeds
    /// `risk_escalation_threshold`.
    #[validate(range(min = 0.0, max = 1.0))]
    pub high_risk_confidence: f32,

    /// Required confidence for ordinary queries in adaptive mode.
    #[validate(range(min = 0.0, max = 1.0))]
    pub base_confidence: f32,

    /// Risk score above which the high-risk confidence bar applies.
    #[validate(range(min = 0.0, max = 1.0))]
    pub risk_escalation_threshold: f32,

    /// Optional paced-admission gate awaited before each attempt.
    #[validate(nested)]
    pub admission: AdmissionSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            mode: GatewayMode::Adaptive,
            energy_budget: 100.0,
            failure_penalty: 2.0,
            max_attempts: Some(4),
            attempt_pause_ms: 1000,
            high_risk_confidence: 0.95,
            base_confidence: 0.85,
            risk_escalation_threshold: 0.7,
            admission: AdmissionSettings::default(),
        }
    }
}

/// Paced-admission gate settings (off by default).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AdmissionSettings {
    pub enabled: bool,

    /// Full admission cycle length.
    #[validate(range(min = 1))]
    pub period_ms: u64,

    /// Fraction of the cycle during which attempts are admitted.
    #[validate(range(min = 0.01, max = 1.0))]
    pub window_ratio: f64,
}

impl Default for AdmissionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            period_ms: 1000,
            window_ratio: 0.1,
        }
    }
}

/// Optional snapshot persistence.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotSettings {
    /// Path of the snapshot file; `None` disables persistence.
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_valid_offline_configuration() {
        let config = SemgateConfig::default();
        config.validate_strict().expect("defaults must validate");
        assert_eq!(config.providers.default_route, Provider::Mock);
        assert_eq!(config.cache.similarity_threshold, 0.92);
        assert_eq!(config.cache.capacity, 1000);
        assert_eq!(config.defense.similarity_threshold, 0.85);
        assert_eq!(config.generation.energy_budget, 100.0);
        assert_eq!(config.generation.max_attempts, Some(4));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = SemgateConfig::default();
        config.cache.similarity_threshold = 1.5;
        assert!(config.validate_strict().is_err());
    }

    #[test]
    fn openai_embedding_route_is_rejected() {
        let mut config = SemgateConfig::default();
        config.providers.embedding_provider = Provider::OpenAi;
        assert!(matches!(
            config.validate_strict(),
            Err(ConfigError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = SemgateConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SemgateConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
