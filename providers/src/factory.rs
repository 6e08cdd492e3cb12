//! Builds clients from configuration.
//!
//! Route resolution happens here, once, at construction: a missing
//! credential or an unsupported route is a fatal [`ConfigError`] before any
//! traffic flows, never a per-request failure.

use crate::embedding::{EmbeddingClient, GeminiEmbeddingService, MockEmbeddingService};
use crate::generation::{GeminiGenerationService, GenerationClient, MockGenerationService};
use config::ProviderSettings;
use errors::ConfigError;
use sg_core::Provider;
use tracing::info;

/// Builds the embedding client for the configured embedding provider.
pub fn embedding_client(settings: &ProviderSettings) -> Result<EmbeddingClient, ConfigError> {
    let client = match settings.embedding_provider {
        Provider::Google => {
            let google = &settings.google;
            if google.api_key.is_empty() {
                return Err(ConfigError::MissingCredential {
                    credential: "providers.google.api_key".to_string(),
                });
            }
            let service = GeminiEmbeddingService::new(
                google.api_key.clone(),
                google.embedding_model.clone(),
                settings.embedding_dimension,
            )
            .with_base_url(google.base_url.clone());
            EmbeddingClient::gemini(service)
        }
        Provider::Mock => {
            EmbeddingClient::mock(MockEmbeddingService::new(settings.embedding_dimension))
        }
        other => {
            return Err(ConfigError::InvalidRoute {
                route: format!("embedding via {other}"),
            });
        }
    };

    info!(provider = %settings.embedding_provider, dimension = settings.embedding_dimension,
        "embedding client ready");
    Ok(client)
}

/// Builds the generation client for the configured default route.
pub fn generation_client(settings: &ProviderSettings) -> Result<GenerationClient, ConfigError> {
    let client = match settings.default_route {
        Provider::Google => {
            let google = &settings.google;
            if google.api_key.is_empty() {
                return Err(ConfigError::MissingCredential {
                    credential: "providers.google.api_key".to_string(),
                });
            }
            let service = GeminiGenerationService::new(
                google.api_key.clone(),
                google.model.clone(),
                google.pro_model.clone(),
            )
            .with_base_url(google.base_url.clone());
            GenerationClient::gemini(service)
        }
        Provider::OpenAi => openai_route(settings)?,
        Provider::Mock => GenerationClient::mock(MockGenerationService::new()),
    };

    info!(route = %settings.default_route, "generation client ready");
    Ok(client)
}

#[cfg(feature = "openai-provider")]
fn openai_route(settings: &ProviderSettings) -> Result<GenerationClient, ConfigError> {
    let openai = &settings.openai;
    if openai.api_key.is_empty() {
        return Err(ConfigError::MissingCredential {
            credential: "providers.openai.api_key".to_string(),
        });
    }
    Ok(GenerationClient::openai(
        crate::generation::OpenAiGenerationService::new(
            openai.api_key.clone(),
            openai.model.clone(),
        ),
    ))
}

#[cfg(not(feature = "openai-provider"))]
fn openai_route(_settings: &ProviderSettings) -> Result<GenerationClient, ConfigError> {
    Err(ConfigError::RouteNotCompiled {
        route: Provider::OpenAi.to_string(),
        feature: "openai-provider".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_route_without_key_is_fatal() {
        let mut settings = ProviderSettings::default();
        settings.default_route = Provider::Google;

        let err = generation_client(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
    }

    #[test]
    fn mock_route_needs_no_credentials() {
        let settings = ProviderSettings::default();
        assert!(generation_client(&settings).is_ok());
        assert!(embedding_client(&settings).is_ok());
    }

    #[test]
    fn embedding_dimension_flows_into_the_client() {
        let mut settings = ProviderSettings::default();
        settings.embedding_dimension = 16;
        let client = embedding_client(&settings).unwrap();
        assert_eq!(client.dimension(), 16);
    }
}
