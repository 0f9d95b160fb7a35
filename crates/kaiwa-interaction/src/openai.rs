//! OpenAiChatClient - Direct REST client for the OpenAI Chat Completions API.
//!
//! Configuration priority: ~/.config/kaiwa/secret.json > environment variables

use async_trait::async_trait;
use kaiwa_core::completion::CompletionBackend;
use kaiwa_core::error::CompletionError;
use kaiwa_core::transcript::{Role, Turn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;

use crate::config::{self, ConfigError};

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Instruction prepended to every outbound request.
///
/// Lives only on the wire; it is never stored in the visible transcript.
const SYSTEM_PROMPT: &str = "あなたは親切で丁寧なAIアシスタントです。";

/// Completion backend that talks to the OpenAI HTTP API.
///
/// One outbound call per invocation; no retry, no caching, and no
/// timeout beyond the transport's default.
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Loads configuration from ~/.config/kaiwa/secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/kaiwa/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL_NAME)
    ///
    /// Model name defaults to `gpt-3.5-turbo` if not specified.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        if let Ok(secret_config) = config::load_secret_config() {
            if let Some(openai_config) = secret_config.openai {
                let model = openai_config
                    .model_name
                    .unwrap_or_else(|| DEFAULT_MODEL.into());
                return Ok(Self::new(openai_config.api_key, model));
            }
        }

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        let model = env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_messages(turns: &[Turn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        });
        messages.extend(turns.iter().map(ChatMessage::from_turn));
        messages
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "completion request could not be sent");
                CompletionError::transport()
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %body_text,
                "completion service returned an error"
            );
            return Err(CompletionError::status(status.as_u16()));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            tracing::warn!(error = %err, "completion response body did not parse");
            CompletionError::malformed()
        })?;

        extract_reply(parsed)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiChatClient {
    async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError> {
        if turns.is_empty() {
            tracing::warn!("completion requested with an empty transcript");
            return Err(CompletionError::malformed());
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(turns),
        };

        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn from_turn(turn: &Turn) -> Self {
        let role = match turn.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role,
            content: turn.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn extract_reply(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            tracing::warn!("completion response contained no reply content");
            CompletionError::malformed()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaiwa_core::error::CompletionErrorKind;

    #[test]
    fn outbound_messages_start_with_the_system_instruction() {
        let turns = vec![
            Turn::user("Hello"),
            Turn::assistant("Hi there"),
            Turn::user("How are you?"),
        ];

        let messages = OpenAiChatClient::build_messages(&turns);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].content, "How are you?");
    }

    #[test]
    fn request_body_serializes_to_the_documented_shape() {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: OpenAiChatClient::build_messages(&[Turn::user("Hello")]),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Hello");
    }

    #[test]
    fn reply_text_is_returned_verbatim() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  spaced reply \n"}}]}"#,
        )
        .unwrap();

        assert_eq!(extract_reply(response).unwrap(), "  spaced reply \n");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();

        let err = extract_reply(response).unwrap_err();
        assert_eq!(err.kind(), CompletionErrorKind::Malformed);
    }

    #[test]
    fn null_content_is_malformed() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();

        let err = extract_reply(response).unwrap_err();
        assert_eq!(err.kind(), CompletionErrorKind::Malformed);
    }
}
