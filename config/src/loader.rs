//! Environment variable overrides (`SEMGATE_*`), applied on top of file or
//! default values per 12-factor practice. Parse failures are fatal: a typo
//! in an override must not silently fall back to a default.

use crate::config::SemgateConfig;
use errors::ConfigError;
use sg_core::{GatewayMode, Provider};
use std::str::FromStr;
use tracing::debug;

fn parsed<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|err| ConfigError::InvalidValue {
        field: name.to_string(),
        reason: format!("{err} (got {raw:?})"),
    })
}

/// Applies `SEMGATE_*` environment overrides to `config` in place.
pub fn apply_env(config: &mut SemgateConfig) -> Result<(), ConfigError> {
    if let Ok(key) = std::env::var("SEMGATE_GOOGLE_API_KEY") {
        config.providers.google.api_key = key;
    }
    if let Ok(key) = std::env::var("SEMGATE_OPENAI_API_KEY") {
        config.providers.openai.api_key = key;
    }
    if let Ok(model) = std::env::var("SEMGATE_GOOGLE_MODEL") {
        config.providers.google.model = model;
    }
    if let Ok(model) = std::env::var("SEMGATE_OPENAI_MODEL") {
        config.providers.openai.model = model;
    }
    if let Ok(url) = std::env::var("SEMGATE_GOOGLE_BASE_URL") {
        config.providers.google.base_url = url;
    }

    if let Ok(raw) = std::env::var("SEMGATE_DEFAULT_ROUTE") {
        config.providers.default_route = parsed::<Provider>("SEMGATE_DEFAULT_ROUTE", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_EMBEDDING_PROVIDER") {
        config.providers.embedding_provider =
            parsed::<Provider>("SEMGATE_EMBEDDING_PROVIDER", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_EMBEDDING_DIMENSION") {
        config.providers.embedding_dimension = parsed("SEMGATE_EMBEDDING_DIMENSION", &raw)?;
    }

    if let Ok(raw) = std::env::var("SEMGATE_GATEWAY_MODE") {
        config.generation.mode = parsed::<GatewayMode>("SEMGATE_GATEWAY_MODE", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_ENERGY_BUDGET") {
        config.generation.energy_budget = parsed("SEMGATE_ENERGY_BUDGET", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_FAILURE_PENALTY") {
        config.generation.failure_penalty = parsed("SEMGATE_FAILURE_PENALTY", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_MAX_ATTEMPTS") {
        config.generation.max_attempts = match raw.as_str() {
            "none" | "unbounded" => None,
            _ => Some(parsed("SEMGATE_MAX_ATTEMPTS", &raw)?),
        };
    }
    if let Ok(raw) = std::env::var("SEMGATE_ATTEMPT_PAUSE_MS") {
        config.generation.attempt_pause_ms = parsed("SEMGATE_ATTEMPT_PAUSE_MS", &raw)?;
    }

    if let Ok(raw) = std::env::var("SEMGATE_CACHE_THRESHOLD") {
        config.cache.similarity_threshold = parsed("SEMGATE_CACHE_THRESHOLD", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_CACHE_CAPACITY") {
        config.cache.capacity = parsed("SEMGATE_CACHE_CAPACITY", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_DEFENSE_THRESHOLD") {
        config.defense.similarity_threshold = parsed("SEMGATE_DEFENSE_THRESHOLD", &raw)?;
    }
    if let Ok(raw) = std::env::var("SEMGATE_SEED_BUILTIN") {
        config.defense.seed_builtin = raw.to_lowercase() == "true" || raw == "1";
    }

    if let Ok(path) = std::env::var("SEMGATE_SNAPSHOT_PATH") {
        config.snapshot.path = Some(path.into());
    }

    debug!("environment overrides applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for (name, _) in std::env::vars() {
            if name.starts_with("SEMGATE_") {
                unsafe { std::env::remove_var(&name) };
            }
        }
    }

    #[test]
    #[serial]
    fn env_overrides_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("SEMGATE_DEFAULT_ROUTE", "google");
            std::env::set_var("SEMGATE_GOOGLE_API_KEY", "test-key");
            std::env::set_var("SEMGATE_CACHE_CAPACITY", "50");
            std::env::set_var("SEMGATE_MAX_ATTEMPTS", "none");
        }

        let mut config = SemgateConfig::default();
        apply_env(&mut config).unwrap();

        assert_eq!(config.providers.default_route, Provider::Google);
        assert_eq!(config.providers.google.api_key, "test-key");
        assert_eq!(config.cache.capacity, 50);
        assert_eq!(config.generation.max_attempts, None);
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_override_is_fatal() {
        clear_env();
        unsafe { std::env::set_var("SEMGATE_CACHE_CAPACITY", "lots") };

        let mut config = SemgateConfig::default();
        let err = apply_env(&mut config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. }
            if field == "SEMGATE_CACHE_CAPACITY"));
        clear_env();
    }
}
