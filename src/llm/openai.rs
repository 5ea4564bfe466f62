use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

use super::{ChatMessage, CompletionClient, CompletionRequest, LlmError};
use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`. No retries.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        // Read per request so a rotated key needs no restart.
        let api_key = std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.config.api_key_env.clone()))?;

        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            response_format: request
                .json_object
                .then(|| json!({ "type": "json_object" })),
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            warn!(%status, "completion API error");
            return Err(LlmError::Api { status, body });
        }

        let parsed = response.json::<ChatCompletionResponse>().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;
        debug!(len = content.len(), "completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, key_env: &str) -> LlmConfig {
        LlmConfig {
            base_url: format!("{}/v1", server.uri()),
            model: "test-model".into(),
            api_key_env: key_env.into(),
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 256,
            timeout_secs: 5,
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("an apple")],
            json_object: true,
        }
    }

    #[tokio::test]
    async fn returns_first_choice_content_and_sends_sampling_params() {
        std::env::set_var("MEALTRACK_TEST_KEY_OK", "sk-test");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 256,
                "response_format": { "type": "json_object" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"calories\": 95}" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server, "MEALTRACK_TEST_KEY_OK")).unwrap();
        let content = client.complete(&request()).await.expect("completion");
        assert_eq!(content, "{\"calories\": 95}");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_once_without_retry() {
        std::env::set_var("MEALTRACK_TEST_KEY_FAIL", "sk-test");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server, "MEALTRACK_TEST_KEY_FAIL")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        match err {
            LlmError::Api { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        std::env::set_var("MEALTRACK_TEST_KEY_EMPTY", "sk-test");
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server, "MEALTRACK_TEST_KEY_EMPTY")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client =
            OpenAiClient::new(config_for(&server, "MEALTRACK_TEST_KEY_SURELY_UNSET")).unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(ref name) if name == "MEALTRACK_TEST_KEY_SURELY_UNSET"));
    }
}
