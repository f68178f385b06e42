use anyhow::{Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::message::Message;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub provider: String,
    pub conversation_history: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: Option<String>,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}",
                response.status()
            ));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;

    #[test]
    fn test_request_serializes_to_the_backend_wire_shape() {
        let request = ChatRequest {
            message: "Hello".to_string(),
            provider: "grok".to_string(),
            conversation_history: vec![Message {
                id: 1,
                text: "earlier".to_string(),
                sender: Sender::User,
                provider: None,
                timestamp: "09:15".to_string(),
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["message"], "Hello");
        assert_eq!(value["provider"], "grok");

        let history = value["conversation_history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["sender"], "user");
    }

    #[test]
    fn test_trailing_slash_is_trimmed_from_the_base_url() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
