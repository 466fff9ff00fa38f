//! Tool trait and result types for agent-callable capabilities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The outcome of one tool execution.
///
/// `output` carries a JSON document describing the result; `error` is set
/// only when `success` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    /// Successful result wrapping a JSON payload.
    pub fn json(payload: &serde_json::Value) -> Self {
        Self {
            success: true,
            output: payload.to_string(),
            error: None,
        }
    }

    /// Failed result with an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message.into()),
        }
    }
}

/// Declarative description of a tool for model-facing registries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// An agent-callable capability with a JSON argument schema.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema object describing `execute` arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Run the tool against parsed JSON arguments.
    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_serde_round_trip() {
        let result = ToolResult::json(&serde_json::json!({"status": "found"}));
        let json = serde_json::to_string(&result).unwrap();
        let parsed: ToolResult = serde_json::from_str(&json).unwrap();
        assert!(parsed.success);
        assert!(parsed.output.contains("found"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn failure_sets_error() {
        let result = ToolResult::failure("boom");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.output.is_empty());
    }
}
