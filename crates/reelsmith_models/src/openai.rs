//! OpenAI-compatible chat completions client.

use crate::CompletionConfig;
use crate::http::{api_key, json_body, request_error};
use async_trait::async_trait;
use reelsmith_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reelsmith_interface::{CompletionProvider, CompletionRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    role: String,
    /// Message text
    content: String,
}

impl ChatMessage {
    /// Create a message.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Chat completions request body.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation, system message first
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[builder(default = "0.7")]
    temperature: f32,
}

impl ChatRequest {
    /// Creates a new builder for `ChatRequest`.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    /// Translate a completion request for `model`.
    pub fn from_completion(model: &str, request: &CompletionRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system() {
            messages.push(ChatMessage::new("system", system.clone()));
        }
        messages.push(ChatMessage::new("user", request.prompt().clone()));
        Self {
            model: model.to_string(),
            messages,
            temperature: *request.temperature(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Completion provider for any OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompletion {
    /// Creates a client, reading the API key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error if the variable is unset or empty.
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn from_env(config: &CompletionConfig) -> ProviderResult<Self> {
        let key = api_key(config.api_key_env())?;
        Ok(Self::with_api_key(key, config))
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>, config: &CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: config.base_url().clone(),
            model: config.model().clone(),
        }
    }

    /// Model sent with each request.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletion {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let body = ChatRequest::from_completion(&self.model, request);
        debug!(url = %self.base_url, messages = body.messages().len(), "Sending completion request");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let parsed: ChatResponse = json_body(response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::InvalidResponse(
                    "completion has no content".to_string(),
                ))
            })
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_comes_first() {
        let request = CompletionRequest::builder()
            .prompt("Five facts about owls")
            .system(Some("Be brief.".to_string()))
            .temperature(1.0)
            .build()
            .unwrap();
        let body = ChatRequest::from_completion("gpt-4o-mini", &request);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Five facts about owls");
        assert_eq!(json["temperature"], 1.0);
    }

    #[test]
    fn test_prompt_only_has_one_message() {
        let body = ChatRequest::from_completion("m", &CompletionRequest::prompt_only("hi"));
        assert_eq!(body.messages(), &vec![ChatMessage::new("user", "hi")]);
    }

    #[test]
    fn test_response_shape() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "Owls!"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Owls!"));
    }
}
