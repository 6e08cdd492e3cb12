//! Google Gemini generation backend (`generateContent` REST endpoint).

use super::{estimate_cost, heuristic_confidence};
use async_trait::async_trait;
use errors::ProviderError;
use serde::{Deserialize, Serialize};
use sg_core::traits::GenerationService;
use sg_core::{Generation, GenerationRequest, Provider};
use std::time::Duration;

const PROVIDER: &str = "google";

// Published per-token rates for the flash tier.
const INPUT_RATE: f64 = 0.000_000_1;
const OUTPUT_RATE: f64 = 0.000_000_4;

/// Effort tier at which requests switch to the pro model, when one is
/// configured.
const PRO_EFFORT: u32 = 4;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiGenerationService {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    pro_model: Option<String>,
}

impl GeminiGenerationService {
    pub fn new(api_key: String, model: String, pro_model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key,
            model,
            pro_model,
        }
    }

    /// Overrides the API base URL (tests point this at a local mock
    /// server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Higher effort tiers route to the pro model when configured.
    fn model_for_effort(&self, effort: u32) -> &str {
        if effort >= PRO_EFFORT {
            self.pro_model.as_deref().unwrap_or(&self.model)
        } else {
            &self.model
        }
    }
}

#[async_trait]
impl GenerationService for GeminiGenerationService {
    type Error = ProviderError;

    async fn generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, Self::Error> {
        let model = self.model_for_effort(request.effort);
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
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

        let body: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Malformed {
                    provider: PROVIDER.to_string(),
                    reason: err.to_string(),
                })?;

        let text = body
            .candidates
            .and_then(|mut candidates| candidates.drain(..).next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .and_then(|mut parts| parts.drain(..).next())
            .and_then(|part| part.text)
            .ok_or_else(|| ProviderError::Malformed {
                provider: PROVIDER.to_string(),
                reason: "no content generated".to_string(),
            })?;

        Ok(Generation {
            confidence: heuristic_confidence(request.temperature),
            cost: estimate_cost(prompt, &text, INPUT_RATE, OUTPUT_RATE),
            text,
            provider: Provider::Google,
        })
    }
}
