//! Agent System
//!
//! Translation agents used by the job worker:
//!
//! - **LLM agent**: asks a chat-completion provider (OpenAI, OpenRouter, Groq) for the translation
//! - **Simulated agent**: echoes the source text, used when no provider is configured

pub mod translator;

pub use translator::{
    delegate_from_config, invoke_translation, AgentOutput, LlmTranslationAgent,
    SimulatedTranslationAgent, TranslationDelegate,
};
