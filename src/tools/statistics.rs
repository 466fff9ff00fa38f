//! Environmental statistics tool for a named Ontario area.
//!
//! Biodiversity metrics come from iNaturalist, bird metrics from eBird.
//! Water quality is a named metric pending dataset integration.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::datasets::{BoundingBox, DateRange, Observation, ObservationProvider};
use crate::store::AreaStore;

use super::traits::{Tool, ToolResult};

/// Default observation window when no dates are supplied.
const DEFAULT_WINDOW_DAYS: i64 = 30;
const OBSERVATION_LIMIT: usize = 200;
/// How many individual observations are echoed back in the payload.
const SAMPLE_SIZE: usize = 20;

pub struct AreaStatisticsTool {
    store: Arc<dyn AreaStore>,
    inaturalist: Arc<dyn ObservationProvider>,
    ebird: Option<Arc<dyn ObservationProvider>>,
}

impl AreaStatisticsTool {
    pub fn new(
        store: Arc<dyn AreaStore>,
        inaturalist: Arc<dyn ObservationProvider>,
        ebird: Option<Arc<dyn ObservationProvider>>,
    ) -> Self {
        Self {
            store,
            inaturalist,
            ebird,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatisticsArgs {
    area_name: String,
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {raw:?} (expected YYYY-MM-DD)"))
}

/// Resolve the requested window, defaulting either end to the trailing
/// 30-day range.
fn resolve_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, String> {
    let default = DateRange::trailing_days(DEFAULT_WINDOW_DAYS);
    Ok(DateRange {
        start: start.map(parse_date).transpose()?.unwrap_or(default.start),
        end: end.map(parse_date).transpose()?.unwrap_or(default.end),
    })
}

fn observation_sample(observations: &[Observation]) -> Vec<serde_json::Value> {
    observations
        .iter()
        .take(SAMPLE_SIZE)
        .map(|o| {
            json!({
                "species_name": o.species_name,
                "common_name": o.common_name,
                "observed_at": o.observed_at.map(|d| d.format("%Y-%m-%d").to_string()),
                "latitude": o.latitude,
                "longitude": o.longitude,
                "source": o.source,
            })
        })
        .collect()
}

#[async_trait]
impl Tool for AreaStatisticsTool {
    fn name(&self) -> &str {
        "area_statistics"
    }

    fn description(&self) -> &str {
        "Get environmental statistics for an Ontario protected area: \
         biodiversity observations (iNaturalist) or bird observations (eBird) \
         over a date range."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "area_name": {
                    "type": "string",
                    "description": "Name of the Ontario area (park, conservation area, or territory)"
                },
                "metric": {
                    "type": "string",
                    "enum": ["biodiversity", "birds", "water_quality"],
                    "description": "Metric to retrieve (default: biodiversity)"
                },
                "start_date": {
                    "type": "string",
                    "description": "Start date for observations (YYYY-MM-DD, default: 30 days ago)"
                },
                "end_date": {
                    "type": "string",
                    "description": "End date for observations (YYYY-MM-DD, default: today)"
                }
            },
            "required": ["area_name"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let args: StatisticsArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return Ok(ToolResult::failure(format!("invalid arguments: {e}"))),
        };

        let range = match resolve_range(args.start_date.as_deref(), args.end_date.as_deref()) {
            Ok(range) => range,
            Err(e) => return Ok(ToolResult::failure(e)),
        };

        let metric = args.metric.as_deref().unwrap_or("biodiversity");
        debug!(
            "statistics for {:?}, metric: {metric}, {} to {}",
            args.area_name, range.start, range.end
        );

        let records = match self.store.find_by_name(&args.area_name, None, 1).await {
            Ok(records) => records,
            Err(e) => return Ok(ToolResult::failure(format!("area lookup failed: {e}"))),
        };
        let Some(area) = records.first() else {
            return Ok(ToolResult::json(&json!({
                "status": "not_found",
                "message": format!(
                    "Area '{}' not found in Ontario database. Try using pick_area first.",
                    args.area_name
                ),
                "area_name": args.area_name,
                "suggestion": "Use the pick_area tool to search for the area",
            })));
        };

        let Some(bounds) = area
            .geometry
            .as_deref()
            .and_then(BoundingBox::from_geojson)
        else {
            warn!("area {:?} has no usable geometry", area.name);
            return Ok(ToolResult::failure(format!(
                "area '{}' has no usable geometry for an observation query",
                area.name
            )));
        };

        let provider: &Arc<dyn ObservationProvider> = match metric {
            "biodiversity" | "species_count" => &self.inaturalist,
            "birds" => match &self.ebird {
                Some(ebird) => ebird,
                None => {
                    return Ok(ToolResult::failure(
                        "eBird API key not configured; bird statistics are unavailable",
                    ))
                }
            },
            "water_quality" => {
                return Ok(ToolResult::json(&json!({
                    "status": "not_available",
                    "message": "Water quality integration is not yet available for Ontario areas",
                    "area": area.name,
                })));
            }
            other => {
                return Ok(ToolResult::failure(format!(
                    "unsupported metric {other:?} (expected 'biodiversity', 'birds', or 'water_quality')"
                )));
            }
        };

        let observations = match provider
            .fetch_observations(&bounds, &range, OBSERVATION_LIMIT)
            .await
        {
            Ok(observations) => observations,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "{} query failed: {e}",
                    provider.source()
                )))
            }
        };

        let species: HashSet<&str> = observations
            .iter()
            .map(|o| o.species_name.as_str())
            .collect();

        Ok(ToolResult::json(&json!({
            "status": "found",
            "area": area.name,
            "area_type": area.area_type.label(),
            "metric": metric,
            "source": provider.source(),
            "period": {
                "start": range.start.format("%Y-%m-%d").to_string(),
                "end": range.end.format("%Y-%m-%d").to_string(),
            },
            "observation_count": observations.len(),
            "species_count": species.len(),
            "observations": observation_sample(&observations),
        })))
    }
}
