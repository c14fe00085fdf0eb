//! Completion gateway trait and the OpenRouter implementation.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::CoachBrainConfig;
use crate::error::BrainError;

/// A service that turns a message list into one reply.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send the messages and return the text of the first choice.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, BrainError>;

    /// Name of this gateway, for logs.
    fn name(&self) -> &str;
}

/// Completion gateway backed by an OpenRouter-compatible HTTP API.
///
/// Every call is a single round trip with no retry.
pub struct OpenRouterBrain {
    client: Client,
    config: CoachBrainConfig,
}

impl OpenRouterBrain {
    /// Create a new gateway with the given configuration.
    pub fn new(config: CoachBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "OpenRouterBrain initialized with model: {}, url: {}",
            config.model, config.api_url
        );

        Ok(Self { client, config })
    }

    /// Create a gateway from environment variables.
    ///
    /// See [`CoachBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(CoachBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CoachBrainConfig {
        &self.config
    }

    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = self.config.completions_url();
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
        };

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request);
        if let Some(ref app_url) = self.config.app_url {
            builder = builder.header("HTTP-Referer", app_url);
        }
        if let Some(ref app_title) = self.config.app_title {
            builder = builder.header("X-Title", app_title);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            warn!(status = status.as_u16(), "Completion service returned an error");

            return Err(BrainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }
}

#[async_trait]
impl CompletionGateway for OpenRouterBrain {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, BrainError> {
        let completion = self.chat_completion(messages).await?;

        debug!(
            id = completion.id.as_deref().unwrap_or("-"),
            model = completion.model.as_deref().unwrap_or("-"),
            choices = completion.choices.len(),
            "Received chat completion"
        );

        if let Some(usage) = completion.usage.as_ref() {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(BrainError::EmptyReply)
    }

    fn name(&self) -> &str {
        "OpenRouterBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn brain_for(server: &MockServer) -> OpenRouterBrain {
        let config = CoachBrainConfig::builder()
            .api_key("test-key")
            .api_url(server.uri())
            .app_url("http://localhost:3000")
            .build();
        OpenRouterBrain::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let config = CoachBrainConfig::builder().build();
        assert!(matches!(
            OpenRouterBrain::new(config),
            Err(BrainError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("x-title", "AI Accountability Coach"))
            .and(header("http-referer", "http://localhost:3000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "gen-1",
                "model": "meta-llama/llama-3-70b-instruct",
                "choices": [
                    {"message": {"role": "assistant", "content": "Vamos planejar sua semana."}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let brain = brain_for(&server);
        let reply = brain
            .complete(vec![ChatMessage::system("coach"), ChatMessage::user("oi")])
            .await
            .unwrap();
        assert_eq!(reply, "Vamos planejar sua semana.");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "meta-llama/llama-3-70b-instruct");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[tokio::test]
    async fn test_complete_maps_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "No auth credentials found", "code": 401}
            })))
            .mount(&server)
            .await;

        let err = brain_for(&server)
            .complete(vec![ChatMessage::user("oi")])
            .await
            .unwrap_err();
        match err {
            BrainError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "No auth credentials found");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_plain_text_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = brain_for(&server)
            .complete(vec![ChatMessage::user("oi")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BrainError::Api { status: 503, ref message } if message == "upstream down"
        ));
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = brain_for(&server)
            .complete(vec![ChatMessage::user("oi")])
            .await
            .unwrap_err();
        assert!(matches!(err, BrainError::InvalidResponse(_)));
        assert!(err.is_unusable_reply());
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = brain_for(&server)
            .complete(vec![ChatMessage::user("oi")])
            .await
            .unwrap_err();
        assert!(matches!(err, BrainError::EmptyReply));
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        // Nothing listens on port 9 (discard) locally
        let config = CoachBrainConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:9")
            .build();
        let brain = OpenRouterBrain::new(config).unwrap();

        let err = brain.complete(vec![ChatMessage::user("oi")]).await.unwrap_err();
        assert!(matches!(err, BrainError::Network(_)));
        assert!(!err.is_unusable_reply());
    }

    #[test]
    fn test_brain_name() {
        let config = CoachBrainConfig::builder().api_key("test-key").build();
        let brain = OpenRouterBrain::new(config).unwrap();
        assert_eq!(brain.name(), "OpenRouterBrain");
    }
}
