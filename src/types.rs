// Type definitions and error taxonomy

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    OpenRouter,
    Groq,
    Simulated,
}

impl LLMProvider {
    /// Parse a provider name as it appears in configuration
    pub fn from_name(name: &str) -> AppResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "groq" => Ok(LLMProvider::Groq),
            "simulated" | "none" => Ok(LLMProvider::Simulated),
            other => Err(AppError::Config(format!("Unsupported LLM provider: {}", other))),
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Groq => write!(f, "groq"),
            LLMProvider::Simulated => write!(f, "simulated"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch translation job: {0}")]
    NotFound(String),

    #[error("Failed to download source file: {0}")]
    Download(String),

    #[error("Translation processing error: {0}")]
    Translation(String),

    #[error("Failed to upload translated file: {0}")]
    Upload(String),

    #[error("Failed to update translation status: {0}")]
    StatusUpdate(String),

    #[error("Supabase client error: {0}")]
    Supabase(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(LLMProvider::from_name("OpenAI").unwrap(), LLMProvider::OpenAI);
        assert_eq!(LLMProvider::from_name(" groq ").unwrap(), LLMProvider::Groq);
        assert_eq!(LLMProvider::from_name("none").unwrap(), LLMProvider::Simulated);
        assert!(matches!(LLMProvider::from_name("glm"), Err(AppError::Config(_))));
        assert_eq!(LLMProvider::OpenRouter.to_string(), "openrouter");
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::Translation("agent crashed".to_string());
        assert_eq!(err.to_string(), "Translation processing error: agent crashed");

        let err = AppError::NotFound("no rows for id d1".to_string());
        assert_eq!(err.to_string(), "Failed to fetch translation job: no rows for id d1");
    }
}
