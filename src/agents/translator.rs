//! Translation Agent
//!
//! The translation itself is delegated to an agent behind [`TranslationDelegate`].
//! Agents do not agree on a result shape, so every result is funneled through
//! [`AgentOutput`] and flattened to plain text by [`invoke_translation`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::LLMConfig;
use crate::llm::provider::{LLMProviderConfig, LLM};
use crate::queue::jobs::TranslationInputs;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest};

/// Opaque translation capability handed to the worker at construction time
#[async_trait]
pub trait TranslationDelegate: Send + Sync {
    async fn kickoff(&self, inputs: &TranslationInputs) -> anyhow::Result<AgentOutput>;
}

/// Known result shapes of a translation agent
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    /// A bare string result
    Text(String),
    /// A result exposing an `output` field
    Output(Value),
    /// A result exposing a `value` field
    Value(Value),
    /// Anything else; coerced to text as a whole
    Other(Value),
}

impl AgentOutput {
    /// Classify a JSON-shaped agent result. `output` wins over `value`.
    pub fn from_json(result: Value) -> Self {
        match result {
            Value::String(text) => AgentOutput::Text(text),
            Value::Object(mut fields) => {
                if let Some(output) = fields.remove("output") {
                    AgentOutput::Output(output)
                } else if let Some(value) = fields.remove("value") {
                    AgentOutput::Value(value)
                } else {
                    AgentOutput::Other(Value::Object(fields))
                }
            }
            other => AgentOutput::Other(other),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AgentOutput::Text(text) => text,
            AgentOutput::Output(value) | AgentOutput::Value(value) | AgentOutput::Other(value) => {
                value_to_text(value)
            }
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Run the delegate and normalize its result to plain text.
///
/// Any delegate failure becomes `AppError::Translation`.
pub async fn invoke_translation(
    delegate: &dyn TranslationDelegate,
    inputs: &TranslationInputs,
) -> AppResult<String> {
    let output = delegate
        .kickoff(inputs)
        .await
        .map_err(|e| AppError::Translation(format!("{:#}", e)))?;
    Ok(output.into_text())
}

/// Stand-in agent that echoes the source text under a marker line.
///
/// Used when no LLM provider is configured and in tests.
#[derive(Debug, Default, Clone)]
pub struct SimulatedTranslationAgent;

#[async_trait]
impl TranslationDelegate for SimulatedTranslationAgent {
    async fn kickoff(&self, inputs: &TranslationInputs) -> anyhow::Result<AgentOutput> {
        Ok(AgentOutput::Text(format!(
            "[Simulated translation from {} to {}]\n\n{}",
            inputs.source_language, inputs.target_language, inputs.source_text
        )))
    }
}

/// Agent that asks a chat-completion model for the translation
pub struct LlmTranslationAgent {
    llm: LLM,
    model: String,
}

impl LlmTranslationAgent {
    pub fn new(llm: LLM, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    fn system_instruction(inputs: &TranslationInputs) -> String {
        format!(
            "You are a professional translator specialised in {topic}. \
             Translate documents from {source} to {target}. \
             Preserve meaning, tone, formatting and paragraph breaks. \
             Use terminology that is current as of {year}. \
             Reply with the translated document only, without commentary.",
            topic = inputs.topic,
            source = inputs.source_language,
            target = inputs.target_language,
            year = inputs.current_year,
        )
    }

    fn build_request(&self, inputs: &TranslationInputs) -> LLMRequest {
        LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::user(&inputs.source_text)],
            max_tokens: None,
            temperature: Some(0.2),
            system_instruction: Some(Self::system_instruction(inputs)),
        }
    }
}

#[async_trait]
impl TranslationDelegate for LlmTranslationAgent {
    async fn kickoff(&self, inputs: &TranslationInputs) -> anyhow::Result<AgentOutput> {
        info!(
            provider = %self.llm.provider(),
            model = %self.model,
            source = %inputs.source_language,
            target = %inputs.target_language,
            text_len = inputs.source_text.len(),
            "Requesting translation"
        );

        let response = self.llm.create_chat_completion(&self.build_request(inputs)).await?;
        if response.content.trim().is_empty() {
            anyhow::bail!("model returned an empty translation (finish reason: {})", response.finish_reason);
        }

        info!(
            output_len = response.content.len(),
            total_tokens = response.usage.total_tokens,
            "Translation received"
        );
        Ok(AgentOutput::Output(Value::String(response.content)))
    }
}

/// Pick the translation agent for the configured provider.
///
/// Falls back to [`SimulatedTranslationAgent`] when the provider has no API key.
pub fn delegate_from_config(config: &LLMConfig) -> AppResult<Arc<dyn TranslationDelegate>> {
    let api_key = match config.active_api_key() {
        Some(key) => key,
        None => {
            warn!(provider = %config.provider, "No LLM API key configured, using simulated translation");
            return Ok(Arc::new(SimulatedTranslationAgent));
        }
    };

    let llm = LLM::new(LLMProviderConfig {
        provider: config.provider,
        api_key,
        base_url: config.base_url.clone(),
    })?;
    Ok(Arc::new(LlmTranslationAgent::new(llm, config.model.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LLMProvider;
    use serde_json::json;

    fn inputs() -> TranslationInputs {
        TranslationInputs {
            source_text: "Hello".to_string(),
            source_language: "English".to_string(),
            target_language: "French".to_string(),
            topic: "General".to_string(),
            current_year: "2026".to_string(),
        }
    }

    struct FixedAgent(Value);

    #[async_trait]
    impl TranslationDelegate for FixedAgent {
        async fn kickoff(&self, _inputs: &TranslationInputs) -> anyhow::Result<AgentOutput> {
            Ok(AgentOutput::from_json(self.0.clone()))
        }
    }

    struct FailingAgent;

    #[async_trait]
    impl TranslationDelegate for FailingAgent {
        async fn kickoff(&self, _inputs: &TranslationInputs) -> anyhow::Result<AgentOutput> {
            anyhow::bail!("crew exploded")
        }
    }

    #[test]
    fn test_output_field_is_used() {
        let output = AgentOutput::from_json(json!({ "output": "Bonjour" }));
        assert_eq!(output, AgentOutput::Output(json!("Bonjour")));
        assert_eq!(output.into_text(), "Bonjour");
    }

    #[test]
    fn test_output_wins_over_value() {
        let output = AgentOutput::from_json(json!({ "value": "Salut", "output": "Bonjour" }));
        assert_eq!(output.into_text(), "Bonjour");

        let output = AgentOutput::from_json(json!({ "value": "Salut" }));
        assert_eq!(output.into_text(), "Salut");
    }

    #[test]
    fn test_unknown_shapes_are_coerced() {
        let output = AgentOutput::from_json(json!({ "raw": "Bonjour", "tokens": 3 }));
        assert!(matches!(output, AgentOutput::Other(_)));
        assert_eq!(output.into_text(), r#"{"raw":"Bonjour","tokens":3}"#);

        assert_eq!(AgentOutput::from_json(json!(42)).into_text(), "42");
        assert_eq!(AgentOutput::from_json(json!("plain")).into_text(), "plain");
        assert_eq!(AgentOutput::from_json(json!({ "output": 7 })).into_text(), "7");
    }

    #[test]
    fn test_invoke_translation_normalizes() {
        let agent = FixedAgent(json!({ "output": "Bonjour" }));
        let text = tokio_test::block_on(invoke_translation(&agent, &inputs())).unwrap();
        assert_eq!(text, "Bonjour");
    }

    #[tokio::test]
    async fn test_invoke_translation_wraps_errors() {
        let err = invoke_translation(&FailingAgent, &inputs()).await.unwrap_err();
        assert!(matches!(err, AppError::Translation(_)));
        assert_eq!(err.to_string(), "Translation processing error: crew exploded");
    }

    #[tokio::test]
    async fn test_simulated_agent() {
        let text = invoke_translation(&SimulatedTranslationAgent, &inputs()).await.unwrap();
        assert_eq!(text, "[Simulated translation from English to French]\n\nHello");
    }

    #[test]
    fn test_system_instruction_mentions_context() {
        let instruction = LlmTranslationAgent::system_instruction(&inputs());
        assert!(instruction.contains("from English to French"));
        assert!(instruction.contains("General"));
        assert!(instruction.contains("2026"));
    }

    #[tokio::test]
    async fn test_llm_agent_against_mock_provider() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "chatcmpl-1",
                    "object": "chat.completion",
                    "created": 1_700_000_000,
                    "model": "gpt-4o-mini",
                    "choices": [{
                        "index": 0,
                        "message": { "role": "assistant", "content": "Bonjour" },
                        "finish_reason": "stop"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let llm = LLM::new(LLMProviderConfig {
            provider: LLMProvider::OpenAI,
            api_key: "sk-test".to_string(),
            base_url: Some(server.url()),
        })
        .unwrap();
        let agent = LlmTranslationAgent::new(llm, "gpt-4o-mini");

        let text = invoke_translation(&agent, &inputs()).await.unwrap();
        assert_eq!(text, "Bonjour");
    }

    #[test]
    fn test_delegate_without_key_is_simulated() {
        let config = LLMConfig {
            provider: LLMProvider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            openai_api_key: String::new(),
            openrouter_api_key: String::new(),
            groq_api_key: String::new(),
            base_url: None,
        };
        let delegate = delegate_from_config(&config).unwrap();
        let text = tokio_test::block_on(invoke_translation(delegate.as_ref(), &inputs())).unwrap();
        assert!(text.starts_with("[Simulated translation"));
    }
}
