//! Proximity search tool: find Ontario areas near a point.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::store::constants::{DEFAULT_SEARCH_RADIUS_KM, NAME_SEARCH_LIMIT};
use crate::store::{AreaStore, AreaType};

use super::traits::{Tool, ToolResult};

pub struct ProximitySearchTool {
    store: Arc<dyn AreaStore>,
}

impl ProximitySearchTool {
    pub fn new(store: Arc<dyn AreaStore>) -> Self {
        Self { store }
    }
}

fn default_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_KM
}

#[derive(Debug, Deserialize)]
struct ProximityArgs {
    latitude: f64,
    longitude: f64,
    #[serde(default = "default_radius")]
    radius_km: f64,
    #[serde(default)]
    area_types: Option<Vec<String>>,
}

fn parse_type_filter(raw: Option<&[String]>) -> Result<Option<Vec<AreaType>>, String> {
    match raw {
        Some(values) if !values.is_empty() => values
            .iter()
            .map(|v| v.parse::<AreaType>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}

#[async_trait]
impl Tool for ProximitySearchTool {
    fn name(&self) -> &str {
        "proximity_search"
    }

    fn description(&self) -> &str {
        "Find Ontario protected areas and First Nations territories within a \
         radius of a point, sorted by distance."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number",
                    "description": "Latitude of the search center point"
                },
                "longitude": {
                    "type": "number",
                    "description": "Longitude of the search center point"
                },
                "radius_km": {
                    "type": "number",
                    "description": "Search radius in kilometers (default: 50km)"
                },
                "area_types": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["park", "conservation", "treaty"]},
                    "description": "Area types to include. Omit for all types."
                }
            },
            "required": ["latitude", "longitude"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let args: ProximityArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return Ok(ToolResult::failure(format!("invalid arguments: {e}"))),
        };

        let type_filter = match parse_type_filter(args.area_types.as_deref()) {
            Ok(filter) => filter,
            Err(e) => return Ok(ToolResult::failure(e)),
        };

        debug!(
            "proximity search: ({}, {}), radius {}km",
            args.latitude, args.longitude, args.radius_km
        );

        let records = match self
            .store
            .find_nearby(
                args.latitude,
                args.longitude,
                args.radius_km,
                type_filter.as_deref(),
                NAME_SEARCH_LIMIT,
            )
            .await
        {
            Ok(records) => records,
            Err(e) => return Ok(ToolResult::failure(format!("proximity search failed: {e}"))),
        };

        if records.is_empty() {
            return Ok(ToolResult::json(&json!({
                "status": "not_found",
                "message": format!(
                    "No Ontario areas found within {}km of ({}, {})",
                    args.radius_km, args.latitude, args.longitude
                ),
                "suggestion": "Try increasing the search radius or checking the coordinates.",
            })));
        }

        let areas: Vec<serde_json::Value> = records
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "official_name": r.official_name,
                    "area_type": r.area_type.label(),
                    "designation": r.designation,
                    "managing_authority": r.managing_authority,
                    "hectares": r.hectares,
                    "distance_km": r.distance_km.map(|d| (d * 100.0).round() / 100.0),
                })
            })
            .collect();

        Ok(ToolResult::json(&json!({
            "status": "found",
            "count": areas.len(),
            "search_center": {"latitude": args.latitude, "longitude": args.longitude},
            "radius_km": args.radius_km,
            "areas": areas,
        })))
    }
}
