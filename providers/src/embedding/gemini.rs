//! Google Gemini embedding backend (`embedContent` REST endpoint).

use async_trait::async_trait;
use errors::ProviderError;
use serde::{Deserialize, Serialize};
use sg_core::traits::EmbeddingService;
use std::time::Duration;

const PROVIDER: &str = "google";

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    content: Content<'a>,
    #[serde(rename = "taskType")]
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Embedding,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

pub struct GeminiEmbeddingService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl GeminiEmbeddingService {
    pub fn new(api_key: String, model: String, dimension: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key,
            model,
            dimension,
        }
    }

    /// Overrides the API base URL (tests point this at a local mock
    /// server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbeddingService {
    type Error = ProviderError;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        let url = format!(
            "{}/v1beta/models/{}:embedContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let payload = EmbedContentRequest {
            content: Content {
                parts: vec![Part { text }],
            },
            task_type: "SEMANTIC_SIMILARITY",
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| ProviderError::Transport {
                provider: PROVIDER.to_string(),
                reason: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Transport {
                provider: PROVIDER.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: EmbedContentResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Malformed {
                    provider: PROVIDER.to_string(),
                    reason: err.to_string(),
                })?;

        if body.embedding.values.len() != self.dimension {
            return Err(ProviderError::Malformed {
                provider: PROVIDER.to_string(),
                reason: format!(
                    "expected {} components, got {}",
                    self.dimension,
                    body.embedding.values.len()
                ),
            });
        }

        Ok(body.embedding.values)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
