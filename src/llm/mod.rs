//! Chat completion client used by the analysis handlers.
//!
//! Handlers only see [`CompletionClient`]; the production implementation is
//! [`OpenAiClient`], tests plug in a scripted client.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// One prompt to complete. Model and sampling parameters belong to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    /// Ask the provider for `response_format: json_object`.
    pub json_object: bool,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion API key not configured (env {0})")]
    MissingApiKey(String),
    #[error("completion request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("completion API returned no content")]
    EmptyResponse,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the text content of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
