use crate::config::ModelConfig;
use crate::{ChatClient, ChatCompletion};
use async_trait::async_trait;
use thrive_core::{ChatMessage, ThriveError, ThriveResult};
use tracing::debug;

/// OpenAI-compatible API backend.
///
/// Works with OpenAI and any other provider that implements the chat
/// completions API (OpenRouter, Groq, self-hosted gateways).
pub struct OpenAiClient {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn chat(&self, messages: &[ChatMessage]) -> ThriveResult<ChatCompletion> {
        let url = format!("{}/v1/chat/completions", self.config.base_url());

        let body = serde_json::json!({
            "model": self.config.model_id,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "messages": messages,
        });

        debug!(model = %self.config.model_id, messages = messages.len(), "Chat completion request");

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ThriveError::Http(e.to_string()))?;

        let status = resp.status();
        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ThriveError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ThriveError::Http(format!(
                "chat completions API error {status}: {raw}"
            )));
        }

        let content = raw["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        if content.is_empty() {
            return Err(ThriveError::Agent("empty completion response".to_string()));
        }

        Ok(ChatCompletion { content, raw })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ModelConfig {
        ModelConfig {
            model_id: "test-model".to_string(),
            api_key: "test-key".to_string(),
            api_base_url: Some(server.uri()),
            temperature: 0.0,
            max_tokens: 256,
        }
    }

    #[tokio::test]
    async fn test_chat_returns_content_and_raw() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cmpl-1",
                "choices": [{"message": {"role": "assistant", "content": "Hello there"}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server));
        let completion = client.chat(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(completion.content, "Hello there");
        assert_eq!(completion.raw["id"], "cmpl-1");
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server));
        let result = client.chat(&[ChatMessage::user("hi")]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "bad key"})),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server));
        let err = client.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }
}
