use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::types::{AppError, AppResult, LLMProvider};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub llm: LLMConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub service_role_key: Option<String>,
    pub table: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub model: String,
    pub openai_api_key: String,
    pub openrouter_api_key: String,
    pub groq_api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    pub temp_dir: Option<PathBuf>,
}

impl SupabaseConfig {
    /// Project URL and service-role key, both required to talk to the backend
    pub fn credentials(&self) -> AppResult<(&str, &str)> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Config("SUPABASE_URL must be set".to_string()))?;
        let key = self
            .service_role_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Config("SUPABASE_SERVICE_ROLE_KEY must be set".to_string()))?;
        Ok((url, key))
    }
}

impl LLMConfig {
    /// API key for the configured provider, if one is set
    pub fn active_api_key(&self) -> Option<String> {
        let key = match self.provider {
            LLMProvider::OpenAI => &self.openai_api_key,
            LLMProvider::OpenRouter => &self.openrouter_api_key,
            LLMProvider::Groq => &self.groq_api_key,
            LLMProvider::Simulated => return None,
        };
        if key.is_empty() {
            None
        } else {
            Some(key.clone())
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig {
                port: var("PORT")
                    .unwrap_or_else(|| "3000".to_string())
                    .parse()
                    .context("PORT must be a port number")?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            supabase: SupabaseConfig {
                url: var("SUPABASE_URL"),
                service_role_key: var("SUPABASE_SERVICE_ROLE_KEY"),
                table: var("SUPABASE_TABLE").unwrap_or_else(|| "translations".to_string()),
                bucket: var("SUPABASE_BUCKET").unwrap_or_else(|| "documents".to_string()),
            },
            llm: LLMConfig {
                provider: LLMProvider::from_name(
                    &var("TRANSLATION_LLM_PROVIDER").unwrap_or_else(|| "openai".to_string()),
                )?,
                model: var("TRANSLATION_LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
                openai_api_key: var("OPENAI_API_KEY").unwrap_or_default(),
                openrouter_api_key: var("OPENROUTER_API_KEY").unwrap_or_default(),
                groq_api_key: var("GROQ_API_KEY").unwrap_or_default(),
                base_url: var("TRANSLATION_LLM_BASE_URL").filter(|u| !u.is_empty()),
            },
            translation: TranslationConfig {
                temp_dir: var("TRANSLATION_TEMP_DIR")
                    .filter(|d| !d.is_empty())
                    .map(PathBuf::from),
            },
        })
    }
}
