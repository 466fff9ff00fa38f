//! Generic OpenAI-compatible chat model.
//!
//! Most hosted LLM APIs follow the same `/v1/chat/completions` format; a
//! single implementation with a configurable base URL covers all of them.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::api_error;
use super::traits::{ChatModel, ChatRequest, ChatResponse};

pub struct OpenAiCompatibleModel {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl OpenAiCompatibleModel {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(ToString::to_string),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Build the completions URL, tolerating base URLs that already carry
    /// the full endpoint path.
    fn chat_completions_url(&self) -> String {
        if self
            .base_url
            .trim_end_matches('/')
            .ends_with("/chat/completions")
        {
            self.base_url.clone()
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [super::traits::ChatMessage],
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl ChatModel for OpenAiCompatibleModel {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let mut http = self.client.post(self.chat_completions_url()).json(&WireRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
        });

        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http.send().await?;
        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        let body: WireResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(ChatResponse { content })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
