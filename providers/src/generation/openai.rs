//! OpenAI generation backend, compiled in with the `openai-provider`
//! feature.

use super::{estimate_cost, heuristic_confidence};
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_trait::async_trait;
use errors::ProviderError;
use sg_core::traits::GenerationService;
use sg_core::{Generation, GenerationRequest, Provider};

const PROVIDER: &str = "openai";

const INPUT_RATE: f64 = 0.000_000_15;
const OUTPUT_RATE: f64 = 0.000_000_6;

pub struct OpenAiGenerationService {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationService {
    pub fn new(api_key: String, model: String) -> Self {
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        let client = async_openai::Client::with_config(config);
        Self { client, model }
    }
}

#[async_trait]
impl GenerationService for OpenAiGenerationService {
    type Error = ProviderError;

    async fn generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Generation, Self::Error> {
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(request.temperature)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|err| ProviderError::Malformed {
                    provider: PROVIDER.to_string(),
                    reason: err.to_string(),
                })?
                .into()])
            .build()
            .map_err(|err| ProviderError::Malformed {
                provider: PROVIDER.to_string(),
                reason: err.to_string(),
            })?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|err| ProviderError::Transport {
                provider: PROVIDER.to_string(),
                reason: err.to_string(),
            })?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::Malformed {
                provider: PROVIDER.to_string(),
                reason: "empty completion".to_string(),
            })?;

        Ok(Generation {
            confidence: heuristic_confidence(request.temperature),
            cost: estimate_cost(prompt, &text, INPUT_RATE, OUTPUT_RATE),
            text,
            provider: Provider::OpenAi,
        })
    }
}
