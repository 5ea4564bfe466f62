use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Settings for the OpenAI-compatible chat completion endpoint.
///
/// The API key itself is not stored here: `api_key_env` names the variable
/// that is read on every request.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub llm: LlmConfig,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mealtrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mealtrack-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let llm = LlmConfig::from_env();
        Ok(Self {
            database_url,
            jwt,
            llm,
        })
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            api_key_env: std::env::var("LLM_API_KEY_ENV")
                .unwrap_or_else(|_| "OPENAI_API_KEY".into()),
            temperature: env_or("LLM_TEMPERATURE", 0.2),
            top_p: env_or("LLM_TOP_P", 1.0),
            max_tokens: env_or("LLM_MAX_TOKENS", 500),
            timeout_secs: env_or("LLM_TIMEOUT_SECS", 30),
        }
    }
}
