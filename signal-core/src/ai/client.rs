//! Chat-completions client
//!
//! One wire shape serves both providers; OpenRouter additionally wants the
//! attribution headers carried in the config. A single attempt per call, no
//! retries: a fatal status or an empty choice list surfaces immediately.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::config::AiConfig;
use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// Multimodal user message: instruction text plus an embedded image.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Seam between prompt-building clients and the provider transport.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Submit a completion request and return the first choice's free text.
    async fn complete(&self, request: ChatRequest) -> AnalysisResult<String>;
}

#[async_trait]
impl<C: ChatBackend + ?Sized> ChatBackend for Arc<C> {
    async fn complete(&self, request: ChatRequest) -> AnalysisResult<String> {
        (**self).complete(request).await
    }
}

/// reqwest-backed chat backend targeting the configured provider.
pub struct HttpChatBackend {
    config: AiConfig,
    client: Client,
}

impl HttpChatBackend {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, request: ChatRequest) -> AnalysisResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request);

        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::AiApi {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AnalysisError::AiResponseMalformed {
                detail: "completion contained no choices".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multimodal_message_serializes_with_image_part() {
        let message = ChatMessage::user_with_image("describe this", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn plain_text_message_serializes_as_string_content() {
        let message = ChatMessage::user_text("summarize");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"], "summarize");
    }

    #[test]
    fn chat_response_takes_first_choice() {
        let raw = r#"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        }"#;

        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.choices[0].message.content, "first");
    }
}
