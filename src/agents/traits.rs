//! Agent trait and exchange types.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::routing::AgentKind;

/// One user turn handed to an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    pub message: String,
    pub session_key: Option<String>,
}

impl AgentInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_key: None,
        }
    }
}

/// An agent's answer to one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    pub response: String,
    pub agent: AgentKind,
    pub tool_calls_made: u32,
    pub metadata: HashMap<String, String>,
}

/// Model parameters shared by both agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }
}

/// A query handler selected by the router.
///
/// Implementations run whatever tool pipeline and synthesis they need and
/// must produce a usable response even when no chat model is reachable.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Handle one user turn.
    async fn run(&self, input: &AgentInput) -> Result<AgentOutput>;

    /// Which handler identity this agent implements.
    fn kind(&self) -> AgentKind;
}
