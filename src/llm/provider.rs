use async_trait::async_trait;
use crate::types::{AppError, AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Provider selection plus credentials
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    /// Overrides the provider's default endpoint (self-hosted gateways, tests)
    pub base_url: Option<String>,
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider: LLMProvider,
}

impl LLM {
    pub fn new(config: LLMProviderConfig) -> AppResult<Self> {
        let base_url = match (&config.base_url, config.provider) {
            (Some(url), _) => url.clone(),
            (None, LLMProvider::OpenAI) => crate::llm::openai::OPENAI_API_BASE.to_string(),
            (None, LLMProvider::OpenRouter) => crate::llm::openai::OPENROUTER_API_BASE.to_string(),
            (None, LLMProvider::Groq) => crate::llm::openai::GROQ_API_BASE.to_string(),
            (None, LLMProvider::Simulated) => {
                return Err(AppError::Config(
                    "The simulated provider has no chat completion endpoint".to_string(),
                ))
            }
        };

        Ok(Self {
            adapter: Box::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &config.api_key,
                &base_url,
            )),
            provider: config.provider,
        })
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_provider_has_no_endpoint() {
        let result = LLM::new(LLMProviderConfig {
            provider: LLMProvider::Simulated,
            api_key: String::new(),
            base_url: None,
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_provider_is_kept() {
        let llm = LLM::new(LLMProviderConfig {
            provider: LLMProvider::Groq,
            api_key: "gsk-test".to_string(),
            base_url: None,
        })
        .unwrap();
        assert_eq!(llm.provider(), LLMProvider::Groq);
    }
}
