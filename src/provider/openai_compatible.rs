//! OpenAI-Compatible Chat Provider
//!
//! Speaks the OpenAI chat completions protocol, which covers the Hugging
//! Face inference router (the default), OpenAI itself, OpenRouter and local
//! servers such as LM Studio or Ollama.

use super::error::{ProviderError, Result};
use super::r#trait::CompletionProvider;
use super::types::*;
use crate::config::{ChatConfig, SecretString};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Chat completion client for any OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OpenAICompatibleProvider {
    api_key: Option<SecretString>,
    base_url: String,
    client: Client,
    name: String,
}

impl OpenAICompatibleProvider {
    /// Build a provider from the `[chat]` config section
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_max_idle_per_host(2)
            .build()?;

        if !config.has_api_key() {
            tracing::warn!("No chat API key configured; test chat replies will fail");
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
            name: provider_name_for(&config.base_url).to_string(),
        })
    }

    fn headers(&self) -> Result<reqwest::header::HeaderMap> {
        let key = self
            .api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        let mut headers = reqwest::header::HeaderMap::new();
        let value: reqwest::header::HeaderValue = format!("Bearer {}", key.expose_secret().trim())
            .parse()
            .map_err(|_| {
                tracing::error!(
                    "Chat API key contains invalid characters (length={})",
                    key.len()
                );
                ProviderError::InvalidApiKey
            })?;
        headers.insert(reqwest::header::AUTHORIZATION, value);
        Ok(headers)
    }

    fn to_wire_request(request: CompletionRequest) -> WireRequest {
        WireRequest {
            model: request.model,
            messages: request
                .messages
                .into_iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: Some(m.content),
                })
                .collect(),
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    async fn handle_error(&self, response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let message = match response.json::<WireErrorResponse>().await {
            Ok(WireErrorResponse {
                error: WireError::Detailed { message },
            }) => message,
            Ok(WireErrorResponse {
                error: WireError::Plain(message),
            }) => message,
            Err(_) => "Unknown error".to_string(),
        };
        ProviderError::Api { status, message }
    }
}

/// Short name derived from the endpoint host, used in logs
fn provider_name_for(base_url: &str) -> &'static str {
    if base_url.contains("huggingface") {
        "huggingface"
    } else if base_url.contains("openrouter") {
        "openrouter"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else {
        "openai-compatible"
    }
}

#[async_trait]
impl CompletionProvider for OpenAICompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        let headers = self.headers()?;
        tracing::info!(
            "{} chat request: model={}, messages={}, max_tokens={}",
            self.name,
            request.model,
            request.messages.len(),
            request.max_tokens
        );

        let body = Self::to_wire_request(request);
        let response = self
            .client
            .post(&self.base_url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        tracing::debug!("{} response status: {}", self.name, status);
        if !status.is_success() {
            let err = self.handle_error(response).await;
            tracing::warn!("{} chat request failed: {}", self.name, err);
            return Err(err);
        }

        let parsed: WireResponse = response.json().await.map_err(ProviderError::from_reqwest)?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty());

        tracing::info!(
            "{} chat reply: {} chars",
            self.name,
            reply.as_ref().map(|r| r.len()).unwrap_or(0)
        );
        Ok(reply)
    }
}

#[derive(Debug, Clone, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    #[serde(default)]
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct WireErrorResponse {
    error: WireError,
}

/// OpenAI nests the error object; the Hugging Face router sometimes sends a bare string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireError {
    Detailed { message: String },
    Plain(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config_for(url: String, key: Option<&str>) -> ChatConfig {
        ChatConfig {
            base_url: url,
            api_key: key.map(SecretString::from),
            ..ChatConfig::default()
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "mistralai/Mistral-Nemo-Instruct-2407".to_string(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: 500,
        }
    }

    #[test]
    fn test_provider_name_from_url() {
        assert_eq!(
            provider_name_for("https://router.huggingface.co/v1/chat/completions"),
            "huggingface"
        );
        assert_eq!(
            provider_name_for("http://localhost:1234/v1/chat/completions"),
            "openai-compatible"
        );
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::PartialJson(json!({
                "model": "mistralai/Mistral-Nemo-Instruct-2407",
                "max_tokens": 500,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hi there"}}]}"#)
            .create_async()
            .await;

        let provider = OpenAICompatibleProvider::from_config(&config_for(
            format!("{}/v1/chat/completions", server.url()),
            Some("hf_test"),
        ))
        .unwrap();

        let reply = provider.complete(request()).await.unwrap();
        assert_eq!(reply.as_deref(), Some("Hi there"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_without_content_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":""}}]}"#)
            .create_async()
            .await;

        let provider = OpenAICompatibleProvider::from_config(&config_for(
            format!("{}/chat", server.url()),
            Some("hf_test"),
        ))
        .unwrap();
        assert_eq!(provider.complete(request()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Invalid credentials in Authorization header"}"#)
            .create_async()
            .await;

        let provider = OpenAICompatibleProvider::from_config(&config_for(
            format!("{}/chat", server.url()),
            Some("hf_bad"),
        ))
        .unwrap();
        match provider.complete(request()).await {
            Err(ProviderError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid credentials"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .expect(0)
            .create_async()
            .await;

        let provider =
            OpenAICompatibleProvider::from_config(&config_for(format!("{}/chat", server.url()), None))
                .unwrap();
        assert!(matches!(
            provider.complete(request()).await,
            Err(ProviderError::MissingApiKey)
        ));
        mock.assert_async().await;
    }
}
