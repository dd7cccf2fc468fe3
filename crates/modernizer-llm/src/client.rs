//! Completion endpoint client.

use crate::config::ModelConfig;
use crate::error::{ModelError, Result};
use crate::prompt::{system_prompt, user_prompt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can turn one source file into its modernized text.
#[async_trait]
pub trait ModernizationModel: Send + Sync {
    /// Return the model's replacement text for `source`, verbatim, asking
    /// for constructs available in `java_release`.
    async fn modernize(
        &self,
        file_name: &str,
        source: &str,
        java_release: &str,
    ) -> Result<String>;
}

/// Chat message in the OpenAI-compatible wire format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        ChatMessage {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Groq (OpenAI-compatible) chat completion client
pub struct GroqClient {
    config: ModelConfig,
    http_client: reqwest::Client,
}

impl GroqClient {
    /// Create a new client
    pub fn new(config: ModelConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("jdk-modernizer/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ModelError::ClientBuild(e.to_string()))?;

        Ok(GroqClient {
            config,
            http_client,
        })
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the two-message request for a file
    pub fn build_request(
        &self,
        file_name: &str,
        source: &str,
        java_release: &str,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::new("system", system_prompt(java_release)),
                ChatMessage::new("user", user_prompt(java_release, file_name, source)),
            ],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl ModernizationModel for GroqClient {
    async fn modernize(
        &self,
        file_name: &str,
        source: &str,
        java_release: &str,
    ) -> Result<String> {
        let request = self.build_request(file_name, source, java_release);
        let url = self.config.completions_url();

        debug!(
            file = %file_name,
            model = %self.config.model,
            java_release,
            bytes = source.len(),
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let cause = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => format!("API error ({status}): {}", parsed.error.message),
                Err(_) => format!("request failed with status {status}: {body}"),
            };
            return Err(ModelError::RemoteCallFailed { cause });
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| ModelError::RemoteCallFailed {
                cause: format!("malformed completion response: {e}"),
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ModelError::EmptyResponse)?;

        info!(file = %file_name, bytes = content.len(), "Received completion");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let config = ModelConfig::new("key").unwrap();
        let client = GroqClient::new(config).unwrap();
        let request = client.build_request("Point.java", "class Point {}", "25");

        assert_eq!(client.model(), "llama-3.3-70b-versatile");
        assert_eq!(request.model, "llama-3.3-70b-versatile");
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, system_prompt("25"));
        assert_eq!(request.messages[1].role, "user");
        assert!(request.messages[1].content.contains("Point.java"));
        assert!(request.messages[1].content.ends_with("class Point {}"));
    }

    #[test]
    fn test_request_text_follows_release() {
        let client = GroqClient::new(ModelConfig::new("key").unwrap()).unwrap();
        let request = client.build_request("User.java", "class User {}", "17");

        assert!(request.messages[0].content.contains("Java 17"));
        assert!(request.messages[1].content.contains("JDK 17"));
        for message in &request.messages {
            assert!(!message.content.contains("25"), "stale release in {}", message.role);
        }
    }

    #[test]
    fn test_request_serializes_to_wire_format() {
        let client = GroqClient::new(ModelConfig::new("key").unwrap()).unwrap();
        let value = serde_json::to_value(client.build_request("A.java", "x", "25")).unwrap();

        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["messages"][1]["role"], "user");
        assert!(value["temperature"].as_f64().unwrap() < 0.2);
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{
            "id": "c1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "record Point(int x, int y) {}"},
                "finish_reason": "stop"
            }]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "record Point(int x, int y) {}");
    }
}
