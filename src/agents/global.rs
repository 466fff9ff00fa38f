//! General-purpose global agent.
//!
//! No Ontario-specific tooling; answers through the chat model with a
//! worldwide-scope prompt, with a deterministic capability summary as the
//! offline fallback.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::providers::{ChatMessage, ChatModel, ChatRequest};
use crate::routing::AgentKind;

use super::prompt::global_prompt;
use super::traits::{Agent, AgentInput, AgentOutput, ModelSettings};

pub struct GlobalAgent {
    model: Option<Arc<dyn ChatModel>>,
    settings: ModelSettings,
}

impl GlobalAgent {
    pub fn new(model: Option<Arc<dyn ChatModel>>, settings: ModelSettings) -> Self {
        Self { model, settings }
    }

    fn fallback_response() -> String {
        format!(
            "{} Ask me about protected areas, biodiversity observations, or \
             conservation topics anywhere in the world.",
            AgentKind::Global.description()
        )
    }
}

#[async_trait]
impl Agent for GlobalAgent {
    async fn run(&self, input: &AgentInput) -> Result<AgentOutput> {
        let response = match &self.model {
            Some(model) => {
                let request = ChatRequest {
                    model: self.settings.model.clone(),
                    messages: vec![
                        ChatMessage::system(global_prompt()),
                        ChatMessage::user(input.message.clone()),
                    ],
                    temperature: self.settings.temperature,
                };
                match model.chat(&request).await {
                    Ok(reply) if !reply.content.trim().is_empty() => reply.content,
                    Ok(_) => Self::fallback_response(),
                    Err(e) => {
                        warn!("chat model failed for global agent: {e}");
                        Self::fallback_response()
                    }
                }
            }
            None => Self::fallback_response(),
        };

        Ok(AgentOutput {
            response,
            agent: AgentKind::Global,
            tool_calls_made: 0,
            metadata: HashMap::new(),
        })
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Global
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ChatResponse;

    struct MockChatModel {
        reply: Option<String>,
    }

    #[async_trait]
    impl ChatModel for MockChatModel {
        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse> {
            match &self.reply {
                Some(reply) => Ok(ChatResponse {
                    content: reply.clone(),
                }),
                None => anyhow::bail!("model unreachable"),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn without_model_returns_capability_summary() {
        let agent = GlobalAgent::new(None, ModelSettings::default());
        let output = agent.run(&AgentInput::new("Amazon rainforest")).await.unwrap();

        assert_eq!(output.agent, AgentKind::Global);
        assert_eq!(output.tool_calls_made, 0);
        assert!(output.response.contains("Global Nature Watch"));
    }

    #[tokio::test]
    async fn model_reply_is_used_when_available() {
        let model: Arc<dyn ChatModel> = Arc::new(MockChatModel {
            reply: Some("The Amazon spans nine countries.".to_string()),
        });
        let agent = GlobalAgent::new(Some(model), ModelSettings::default());
        let output = agent.run(&AgentInput::new("Amazon rainforest")).await.unwrap();

        assert_eq!(output.response, "The Amazon spans nine countries.");
    }

    #[tokio::test]
    async fn model_failure_falls_back_to_summary() {
        let model: Arc<dyn ChatModel> = Arc::new(MockChatModel { reply: None });
        let agent = GlobalAgent::new(Some(model), ModelSettings::default());
        let output = agent.run(&AgentInput::new("Amazon rainforest")).await.unwrap();

        assert!(output.response.contains("Global Nature Watch"));
    }
}
