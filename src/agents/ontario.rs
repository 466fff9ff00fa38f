//! Ontario-specialized agent.
//!
//! Runs the Ontario tool pipeline against the user's message and composes a
//! response. When a chat model is configured it synthesizes the final answer
//! from the tool output; otherwise (or when the model call fails) it falls
//! back to deterministic formatting so the handler stays usable offline.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::providers::{ChatMessage, ChatModel, ChatRequest};
use crate::routing::AgentKind;
use crate::tools::{Tool, ToolSpec};

use super::prompt::ontario_prompt;
use super::traits::{Agent, AgentInput, AgentOutput, ModelSettings};

pub struct OntarioAgent {
    tools: Vec<Box<dyn Tool>>,
    model: Option<Arc<dyn ChatModel>>,
    settings: ModelSettings,
}

impl OntarioAgent {
    pub fn new(
        tools: Vec<Box<dyn Tool>>,
        model: Option<Arc<dyn ChatModel>>,
        settings: ModelSettings,
    ) -> Self {
        Self {
            tools,
            model,
            settings,
        }
    }

    fn tool_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    async fn run_tool(&self, name: &str, args: Value) -> Option<Value> {
        let tool = self.tools.iter().find(|t| t.name() == name)?;
        match tool.execute(args).await {
            Ok(result) if result.success => serde_json::from_str(&result.output).ok(),
            Ok(result) => {
                warn!(
                    "tool {name} reported failure: {}",
                    result.error.as_deref().unwrap_or("unknown")
                );
                None
            }
            Err(e) => {
                warn!("tool {name} errored: {e}");
                None
            }
        }
    }

    /// Deterministic answer from the area-search payload.
    fn format_search_result(message: &str, payload: Option<&Value>) -> String {
        let Some(payload) = payload else {
            return "I'm having trouble accessing the Ontario protected areas database \
                    right now. Please try again in a moment."
                .to_string();
        };

        match payload["status"].as_str() {
            Some("found") => {
                let name = payload["name"].as_str().unwrap_or("the area");
                let designation = payload["designation"].as_str().unwrap_or("protected area");
                let authority = payload["managing_authority"].as_str().unwrap_or("Ontario");
                let mut response =
                    format!("I found {name}, a {designation} managed by {authority}.");
                if payload["area_type"].as_str() == Some("Williams Treaty Territory") {
                    response.push_str(&format!(
                        " This area is within the traditional territory of {name}, \
                         a signatory of the Williams Treaties (1923)."
                    ));
                }
                response
            }
            Some("multiple_found") => {
                let names: Vec<&str> = payload["results"]
                    .as_array()
                    .map(|results| {
                        results
                            .iter()
                            .filter_map(|r| r["name"].as_str())
                            .collect()
                    })
                    .unwrap_or_default();
                format!(
                    "I found multiple Ontario areas matching your request: {}. \
                     Could you be more specific?",
                    names.join(", ")
                )
            }
            _ => format!(
                "I couldn't find any Ontario areas matching '{message}'. \
                 Would you like to try a different search term or location?"
            ),
        }
    }

    async fn synthesize(&self, input: &AgentInput, tool_context: &str) -> Option<String> {
        let model = self.model.as_ref()?;
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(ontario_prompt(&self.tool_specs())),
                ChatMessage::user(format!(
                    "{}\n\nTool results:\n{tool_context}",
                    input.message
                )),
            ],
            temperature: self.settings.temperature,
        };

        match model.chat(&request).await {
            Ok(response) if !response.content.trim().is_empty() => Some(response.content),
            Ok(_) => None,
            Err(e) => {
                warn!("chat model failed, falling back to tool formatting: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl Agent for OntarioAgent {
    async fn run(&self, input: &AgentInput) -> Result<AgentOutput> {
        let search = self
            .run_tool("pick_area", json!({"place_name": input.message}))
            .await;

        let tool_context = search
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "(no tool results)".to_string());

        let response = match self.synthesize(input, &tool_context).await {
            Some(content) => content,
            None => Self::format_search_result(&input.message, search.as_ref()),
        };

        let mut metadata = HashMap::new();
        if let Some(status) = search.as_ref().and_then(|p| p["status"].as_str()) {
            metadata.insert("search_status".to_string(), status.to_string());
        }

        Ok(AgentOutput {
            response,
            agent: AgentKind::Ontario,
            tool_calls_made: 1,
            metadata,
        })
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Ontario
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::INaturalistProvider;
    use crate::providers::ChatResponse;
    use crate::store::testing::{record, MockAreaStore};
    use crate::store::{AreaRecord, AreaType};
    use crate::tools::ontario_tools;

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

    fn agent(records: Vec<AreaRecord>, model: Option<Arc<dyn ChatModel>>) -> OntarioAgent {
        let tools = ontario_tools(
            Arc::new(MockAreaStore::new(records)),
            Arc::new(INaturalistProvider::new()),
            None,
        );
        OntarioAgent::new(tools, model, ModelSettings::default())
    }

    #[tokio::test]
    async fn single_match_formats_found_message() {
        let agent = agent(vec![record("Algonquin", AreaType::Park, Some(772_300.0))], None);
        let output = agent.run(&AgentInput::new("Algonquin")).await.unwrap();

        assert_eq!(output.agent, AgentKind::Ontario);
        assert_eq!(output.tool_calls_made, 1);
        assert!(output.response.contains("Algonquin"));
        assert!(output.response.contains("managed by"));
        assert_eq!(output.metadata["search_status"], "found");
    }

    #[tokio::test]
    async fn treaty_match_acknowledges_traditional_territory() {
        let agent = agent(vec![record("Curve Lake", AreaType::Treaty, None)], None);
        let output = agent.run(&AgentInput::new("Curve Lake")).await.unwrap();

        assert!(output.response.contains("Williams Treaties (1923)"));
        assert!(output.response.contains("traditional territory"));
    }

    #[tokio::test]
    async fn no_match_suggests_another_search() {
        let agent = agent(vec![], None);
        let output = agent.run(&AgentInput::new("Atlantis")).await.unwrap();

        assert!(output.response.contains("couldn't find"));
        assert_eq!(output.metadata["search_status"], "not_found");
    }

    #[tokio::test]
    async fn multiple_matches_ask_for_specificity() {
        let agent = agent(
            vec![
                record("Silent Lake", AreaType::Park, None),
                record("Silent Lake North", AreaType::Conservation, None),
            ],
            None,
        );
        let output = agent.run(&AgentInput::new("Silent")).await.unwrap();

        assert!(output.response.contains("more specific"));
        assert!(output.response.contains("Silent Lake"));
    }

    #[tokio::test]
    async fn model_reply_wins_when_available() {
        let model: Arc<dyn ChatModel> = Arc::new(MockChatModel {
            reply: Some("Synthesized answer about Algonquin.".to_string()),
        });
        let agent = agent(
            vec![record("Algonquin", AreaType::Park, Some(772_300.0))],
            Some(model),
        );
        let output = agent.run(&AgentInput::new("Algonquin")).await.unwrap();

        assert_eq!(output.response, "Synthesized answer about Algonquin.");
    }

    #[tokio::test]
    async fn model_failure_falls_back_to_tool_formatting() {
        let model: Arc<dyn ChatModel> = Arc::new(MockChatModel { reply: None });
        let agent = agent(
            vec![record("Algonquin", AreaType::Park, Some(772_300.0))],
            Some(model),
        );
        let output = agent.run(&AgentInput::new("Algonquin")).await.unwrap();

        assert!(output.response.contains("I found Algonquin"));
    }
}
