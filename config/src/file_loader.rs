//! Configuration file loading (TOML and YAML), dispatched by extension.

use crate::config::SemgateConfig;
use errors::ConfigError;
use std::path::Path;
use tracing::info;

/// Loads a configuration file, selecting the parser from the extension
/// (`.toml`, `.yaml`/`.yml`). Unknown extensions are fatal.
pub fn load_from_file(path: &Path) -> Result<SemgateConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::FileRead {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let config = match extension {
        "toml" => load_from_toml(&raw),
        "yaml" | "yml" => load_from_yaml(&raw),
        other => Err(ConfigError::FileParse {
            path: path.display().to_string(),
            reason: format!("unsupported config extension {other:?}"),
        }),
    }
    .map_err(|err| match err {
        ConfigError::FileParse { reason, .. } => ConfigError::FileParse {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;

    info!(path = %path.display(), "configuration file loaded");
    Ok(config)
}

pub fn load_from_toml(raw: &str) -> Result<SemgateConfig, ConfigError> {
    toml::from_str(raw).map_err(|err| ConfigError::FileParse {
        path: String::new(),
        reason: err.to_string(),
    })
}

pub fn load_from_yaml(raw: &str) -> Result<SemgateConfig, ConfigError> {
    serde_yaml::from_str(raw).map_err(|err| ConfigError::FileParse {
        path: String::new(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::Provider;

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let raw = r#"
            [providers]
            defaultRoute = "google"

            [cache]
            capacity = 25
        "#;
        let config = load_from_toml(raw).unwrap();
        assert_eq!(config.providers.default_route, Provider::Google);
        assert_eq!(config.cache.capacity, 25);
        // Untouched sections keep their defaults.
        assert_eq!(config.defense.similarity_threshold, 0.85);
    }

    #[test]
    fn yaml_is_supported_too() {
        let raw = "generation:\n  mode: single\n  energyBudget: 12.5\n";
        let config = load_from_yaml(raw).unwrap();
        assert_eq!(config.generation.energy_budget, 12.5);
    }

    #[test]
    fn unsupported_extension_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[providers]").unwrap();
        assert!(matches!(
            load_from_file(&path),
            Err(ConfigError::FileParse { .. })
        ));
    }

    #[test]
    fn garbage_toml_is_fatal() {
        assert!(load_from_toml("not = [valid").is_err());
    }
}
