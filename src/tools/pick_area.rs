//! Area lookup tool: search Ontario areas by name or partial name.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::store::constants::NAME_SEARCH_LIMIT;
use crate::store::{AreaRecord, AreaStore, AreaType};

use super::traits::{Tool, ToolResult};

pub struct PickAreaTool {
    store: Arc<dyn AreaStore>,
}

impl PickAreaTool {
    pub fn new(store: Arc<dyn AreaStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct PickAreaArgs {
    place_name: String,
    #[serde(default)]
    area_type: Option<String>,
}

fn area_summary(record: &AreaRecord) -> serde_json::Value {
    json!({
        "name": record.name,
        "official_name": record.official_name,
        "area_type": record.area_type.label(),
        "designation": record.designation,
        "managing_authority": record.managing_authority,
        "hectares": record.hectares,
    })
}

#[async_trait]
impl Tool for PickAreaTool {
    fn name(&self) -> &str {
        "pick_area"
    }

    fn description(&self) -> &str {
        "Search for Ontario protected areas including provincial parks, \
         conservation areas, and Williams Treaty First Nations territories \
         by name or partial name."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "place_name": {
                    "type": "string",
                    "description": "Name or partial name of the Ontario location"
                },
                "area_type": {
                    "type": "string",
                    "enum": ["park", "conservation", "treaty"],
                    "description": "Optional filter: 'park', 'conservation', or 'treaty'. Omit to search all types."
                }
            },
            "required": ["place_name"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let args: PickAreaArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return Ok(ToolResult::failure(format!("invalid arguments: {e}"))),
        };

        let type_filter = match args.area_type.as_deref() {
            Some(raw) => match raw.parse::<AreaType>() {
                Ok(t) => Some(vec![t]),
                Err(e) => return Ok(ToolResult::failure(e.to_string())),
            },
            None => None,
        };

        debug!(
            "searching Ontario areas for {:?}, type: {}",
            args.place_name,
            args.area_type.as_deref().unwrap_or("all")
        );

        let records = match self
            .store
            .find_by_name(&args.place_name, type_filter.as_deref(), NAME_SEARCH_LIMIT)
            .await
        {
            Ok(records) => records,
            Err(e) => return Ok(ToolResult::failure(format!("area search failed: {e}"))),
        };

        let payload = match records.as_slice() {
            [] => json!({
                "status": "not_found",
                "message": format!("No Ontario areas found matching '{}'", args.place_name),
                "suggestion": "Try searching for a provincial park (e.g. 'Algonquin'), conservation area, or First Nations territory name.",
            }),
            [record] => {
                let mut found = area_summary(record);
                found["status"] = json!("found");
                found["geometry"] = json!(record.geometry);
                found
            }
            many => json!({
                "status": "multiple_found",
                "message": format!(
                    "Found {} Ontario areas matching '{}'. Please specify which one:",
                    many.len(),
                    args.place_name
                ),
                "results": many.iter().map(area_summary).collect::<Vec<_>>(),
                "suggestion": "Choose one from the list or refine your search.",
            }),
        };

        Ok(ToolResult::json(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{record, MockAreaStore};
    use serde_json::Value;

    fn tool_with(records: Vec<AreaRecord>) -> PickAreaTool {
        PickAreaTool::new(Arc::new(MockAreaStore::new(records)))
    }

    async fn run(tool: &PickAreaTool, args: Value) -> Value {
        let result = tool.execute(args).await.unwrap();
        assert!(result.success, "unexpected failure: {:?}", result.error);
        serde_json::from_str(&result.output).unwrap()
    }

    #[tokio::test]
    async fn single_match_is_returned_directly() {
        let tool = tool_with(vec![record("Algonquin", AreaType::Park, Some(772_300.0))]);
        let payload = run(&tool, serde_json::json!({"place_name": "algonquin"})).await;

        assert_eq!(payload["status"], "found");
        assert_eq!(payload["name"], "Algonquin");
        assert_eq!(payload["area_type"], "Provincial Park");
        assert!(payload["geometry"].is_string());
    }

    #[tokio::test]
    async fn multiple_matches_return_disambiguation_list() {
        let tool = tool_with(vec![
            record("Silent Lake", AreaType::Park, Some(1_450.0)),
            record("Silent Lake North", AreaType::Conservation, None),
        ]);
        let payload = run(&tool, serde_json::json!({"place_name": "silent"})).await;

        assert_eq!(payload["status"], "multiple_found");
        assert_eq!(payload["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn no_match_returns_not_found_with_suggestion() {
        let tool = tool_with(vec![]);
        let payload = run(&tool, serde_json::json!({"place_name": "atlantis"})).await;

        assert_eq!(payload["status"], "not_found");
        assert!(payload["suggestion"].as_str().unwrap().contains("Algonquin"));
    }

    #[tokio::test]
    async fn type_filter_narrows_results() {
        let tool = tool_with(vec![
            record("Kawartha", AreaType::Park, None),
            record("Kawartha Highlands", AreaType::Conservation, None),
        ]);
        let payload = run(
            &tool,
            serde_json::json!({"place_name": "kawartha", "area_type": "conservation"}),
        )
        .await;

        assert_eq!(payload["status"], "found");
        assert_eq!(payload["area_type"], "Conservation Area");
    }

    #[tokio::test]
    async fn invalid_area_type_fails() {
        let tool = tool_with(vec![]);
        let result = tool
            .execute(serde_json::json!({"place_name": "x", "area_type": "national"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("national"));
    }

    #[tokio::test]
    async fn missing_place_name_fails() {
        let tool = tool_with(vec![]);
        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(!result.success);
    }

    #[test]
    fn schema_requires_place_name() {
        let tool = tool_with(vec![]);
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"][0], "place_name");
        assert!(schema["properties"]["area_type"]["enum"].is_array());
    }
}
