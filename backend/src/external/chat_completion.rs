//! Chat completion client
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint and requests a
//! strict JSON-schema response shaped like [`shared::StructuredAiReply`].

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};

/// System prompt prepended to every conversation
pub const SYSTEM_PROMPT: &str = "You are GreenSpot, a gardening and landscaping assistant for \
North African climates. Only answer questions about plants, trees, soil, irrigation, gardens \
and landscape design. If the request is about anything else set inScope to false and leave the \
other fields empty. Keep replies practical and concise, suggest at most 8 plants suited to \
hot, dry conditions, and when a garden layout would help write a short designPrompt describing \
it for an image generator.";

/// Client for the chat completion API
#[derive(Clone)]
pub struct ChatCompletionClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Plain text or multi-part (text + image) content
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(text: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }

    pub fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }

    /// User message, with an attached image when a data URL is supplied
    pub fn user(text: &str, image_data_url: Option<&str>) -> Self {
        let content = match image_data_url {
            Some(url) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: text.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: url.to_string(),
                    },
                },
            ]),
            None => MessageContent::Text(text.to_string()),
        };
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    response_format: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
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

/// JSON schema the model's reply must satisfy
pub fn reply_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "garden_assistant_reply",
            "strict": true,
            "schema": {
                "type": "object",
                "additionalProperties": false,
                "required": ["inScope", "reply", "summary", "suggestedPlants", "designPrompt"],
                "properties": {
                    "inScope": { "type": "boolean" },
                    "reply": { "type": "string" },
                    "summary": { "type": "string" },
                    "suggestedPlants": {
                        "type": "array",
                        "items": { "type": "string" },
                        "maxItems": shared::MAX_SUGGESTED_PLANTS
                    },
                    "designPrompt": { "type": "string" }
                }
            }
        }
    })
}

impl ChatCompletionClient {
    pub fn new(http_client: Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Send the conversation and return the raw content of the first choice
    pub async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            response_format: reply_response_format(),
            temperature: 0.4,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Chat API returned {}: {}",
                status, body
            )));
        }

        let data: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse chat response: {}", e))
        })?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalService("Chat response had no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_with_image_serializes_parts() {
        let msg = ChatMessage::user(
            "What is wrong with my fig tree?",
            Some("data:image/png;base64,AAAA"),
        );
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert_eq!(value["content"][1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_plain_message_serializes_string() {
        let value = serde_json::to_value(ChatMessage::system("hi")).unwrap();
        assert_eq!(value["content"], "hi");
    }

    #[test]
    fn test_response_format_requires_all_fields() {
        let format = reply_response_format();
        let required = format["json_schema"]["schema"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
        assert_eq!(format["json_schema"]["strict"], true);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            ChatCompletionClient::new(Client::new(), "https://api.example.com/v1/", "k", "m");
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }
}
