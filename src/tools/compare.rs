//! Comparison tool: Ontario areas side-by-side.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::store::{AreaRecord, AreaStore};

use super::traits::{Tool, ToolResult};

const MIN_AREAS: usize = 2;
const MAX_AREAS: usize = 5;

pub struct CompareAreasTool {
    store: Arc<dyn AreaStore>,
}

impl CompareAreasTool {
    pub fn new(store: Arc<dyn AreaStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct CompareArgs {
    area_names: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn comparison_entry(record: &AreaRecord) -> serde_json::Value {
    json!({
        "name": record.name,
        "official_name": record.official_name,
        "area_type": record.area_type.label(),
        "designation": record.designation,
        "managing_authority": record.managing_authority,
        "hectares": record.hectares.map(round2),
    })
}

#[async_trait]
impl Tool for CompareAreasTool {
    fn name(&self) -> &str {
        "compare_areas"
    }

    fn description(&self) -> &str {
        "Compare 2-5 Ontario protected areas side-by-side: size, type, \
         designation, and managing authority."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "area_names": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of 2-5 Ontario area names to compare"
                }
            },
            "required": ["area_names"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let args: CompareArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return Ok(ToolResult::failure(format!("invalid arguments: {e}"))),
        };

        if args.area_names.len() < MIN_AREAS {
            return Ok(ToolResult::failure(
                "Please provide at least 2 areas to compare",
            ));
        }
        if args.area_names.len() > MAX_AREAS {
            return Ok(ToolResult::failure(
                "Please limit comparison to 5 areas or fewer",
            ));
        }

        debug!("comparing Ontario areas: {:?}", args.area_names);

        let records = match self.store.fetch_details(&args.area_names).await {
            Ok(records) => records,
            Err(e) => return Ok(ToolResult::failure(format!("comparison failed: {e}"))),
        };

        if records.is_empty() {
            return Ok(ToolResult::json(&json!({
                "status": "not_found",
                "message": format!(
                    "No Ontario areas found matching: {}",
                    args.area_names.join(", ")
                ),
                "suggestion": "Check area names and try again",
            })));
        }

        let found_names: HashSet<&str> = records
            .iter()
            .flat_map(|r| [r.name.as_str(), r.official_name.as_str()])
            .collect();
        let missing: Vec<&str> = args
            .area_names
            .iter()
            .map(String::as_str)
            .filter(|name| !found_names.contains(name))
            .collect();

        let comparison: Vec<serde_json::Value> = records.iter().map(comparison_entry).collect();

        let mut by_size: Vec<&AreaRecord> = records.iter().collect();
        by_size.sort_by(|a, b| {
            b.hectares
                .unwrap_or(0.0)
                .total_cmp(&a.hectares.unwrap_or(0.0))
        });
        let total_hectares: f64 = records.iter().filter_map(|r| r.hectares).sum();

        let mut payload = json!({
            "status": "found",
            "count": comparison.len(),
            "areas": comparison,
            "summary": {
                "total_hectares": round2(total_hectares),
                "largest": by_size.first().map(|r| r.name.clone()),
                "smallest": by_size.last().map(|r| r.name.clone()),
            },
        });

        if !missing.is_empty() {
            payload["warning"] = json!(format!("Could not find: {}", missing.join(", ")));
        }

        Ok(ToolResult::json(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{record, MockAreaStore};
    use crate::store::AreaType;
    use serde_json::Value;

    fn tool_with(records: Vec<AreaRecord>) -> CompareAreasTool {
        CompareAreasTool::new(Arc::new(MockAreaStore::new(records)))
    }

    async fn run(tool: &CompareAreasTool, names: &[&str]) -> Value {
        let result = tool
            .execute(serde_json::json!({"area_names": names}))
            .await
            .unwrap();
        assert!(result.success, "unexpected failure: {:?}", result.error);
        serde_json::from_str(&result.output).unwrap()
    }

    #[tokio::test]
    async fn compares_areas_with_summary() {
        let tool = tool_with(vec![
            record("Algonquin", AreaType::Park, Some(772_300.0)),
            record("Silent Lake", AreaType::Park, Some(1_450.0)),
        ]);
        let payload = run(&tool, &["Algonquin", "Silent Lake"]).await;

        assert_eq!(payload["status"], "found");
        assert_eq!(payload["count"], 2);
        assert_eq!(payload["summary"]["largest"], "Algonquin");
        assert_eq!(payload["summary"]["smallest"], "Silent Lake");
        assert_eq!(payload["summary"]["total_hectares"], 773_750.0);
        assert!(payload.get("warning").is_none());
    }

    #[tokio::test]
    async fn reports_missing_areas_in_warning() {
        let tool = tool_with(vec![record("Algonquin", AreaType::Park, Some(772_300.0))]);
        let payload = run(&tool, &["Algonquin", "Atlantis"]).await;

        assert_eq!(payload["status"], "found");
        assert!(payload["warning"].as_str().unwrap().contains("Atlantis"));
    }

    #[tokio::test]
    async fn rejects_fewer_than_two_areas() {
        let tool = tool_with(vec![]);
        let result = tool
            .execute(serde_json::json!({"area_names": ["Algonquin"]}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("at least 2"));
    }

    #[tokio::test]
    async fn rejects_more_than_five_areas() {
        let tool = tool_with(vec![]);
        let names = vec!["a", "b", "c", "d", "e", "f"];
        let result = tool
            .execute(serde_json::json!({"area_names": names}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("5 areas or fewer"));
    }

    #[tokio::test]
    async fn nothing_found_reports_not_found() {
        let tool = tool_with(vec![]);
        let payload = run(&tool, &["Atlantis", "El Dorado"]).await;
        assert_eq!(payload["status"], "not_found");
    }

    #[tokio::test]
    async fn treaty_area_without_hectares_is_handled() {
        let tool = tool_with(vec![
            record("Curve Lake", AreaType::Treaty, None),
            record("Algonquin", AreaType::Park, Some(772_300.0)),
        ]);
        let payload = run(&tool, &["Curve Lake", "Algonquin"]).await;

        assert_eq!(payload["summary"]["largest"], "Algonquin");
        assert_eq!(payload["summary"]["total_hectares"], 772_300.0);
    }
}
