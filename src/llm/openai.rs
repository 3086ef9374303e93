//! Chat completion passthrough
//!
//! Async HTTP client for an OpenAI-compatible chat completions API. The
//! `/chat` endpoint forwards a single user message; no tool definitions are
//! sent - deciding whether to book is not this service's job.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::OpenAiConfig;
use crate::core::{Result, RoombookError};

const SYSTEM_PROMPT: &str =
    "You are a concise and helpful assistant for booking and general questions.";
const EMPTY_REPLY_FALLBACK: &str =
    "I'm here and connected, but I couldn't generate a response just now. Please try again.";

/// OpenAI-compatible chat client
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

/// Chat completions request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// Message in the completions payload
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions response
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
    #[serde(default)]
    content: Option<String>,
}

impl ChatClient {
    /// Create a client from configuration
    pub fn from_config(config: &OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Whether an upstream API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Produce a reply for one user message.
    ///
    /// Without an API key this degrades to an echo so the endpoint stays
    /// usable in unconfigured deployments.
    pub async fn reply(&self, message: &str) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("chat requested without an API key, echoing");
            return Ok(format!("You said: {}", message));
        };

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: 0.3,
            max_tokens: 400,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RoombookError::Chat(format!(
                        "Cannot connect to chat API at {}",
                        self.base_url
                    ))
                } else {
                    RoombookError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RoombookError::Chat(format!(
                "Chat API returned {}: {}",
                status,
                body.trim()
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let reply = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if reply.is_empty() {
            Ok(EMPTY_REPLY_FALLBACK.to_string())
        } else {
            Ok(reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_without_key() -> ChatClient {
        ChatClient::from_config(&OpenAiConfig {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 5,
        })
    }

    #[tokio::test]
    async fn test_echo_fallback_without_key() {
        let client = client_without_key();
        assert!(!client.has_api_key());
        let reply = client.reply("hello there").await.unwrap();
        assert_eq!(reply, "You said: hello there");
    }

    #[test]
    fn test_request_payload_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.3,
            max_tokens: 400,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 400);
    }
}
