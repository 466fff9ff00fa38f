//! Observation provider traits and normalized record types.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }

    /// Bounding box of any GeoJSON geometry (Point, Polygon, MultiPolygon, ...).
    ///
    /// Walks the coordinate tree collecting `[lon, lat]` pairs; returns
    /// `None` for unparseable input or geometry without coordinates.
    pub fn from_geojson(geojson: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(geojson).ok()?;
        let coordinates = value
            .get("coordinates")
            .or_else(|| value.get("geometry").and_then(|g| g.get("coordinates")))?;

        let mut bounds: Option<BoundingBox> = None;
        collect_positions(coordinates, &mut bounds);
        bounds
    }
}

fn collect_positions(value: &serde_json::Value, bounds: &mut Option<BoundingBox>) {
    let Some(items) = value.as_array() else {
        return;
    };

    // A position is an array starting with two numbers: [lon, lat, ...].
    if let [serde_json::Value::Number(lon), serde_json::Value::Number(lat), ..] = items.as_slice() {
        let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) else {
            return;
        };
        let updated = match bounds {
            Some(b) => BoundingBox {
                south: b.south.min(lat),
                west: b.west.min(lon),
                north: b.north.max(lat),
                east: b.east.max(lon),
            },
            None => BoundingBox {
                south: lat,
                west: lon,
                north: lat,
                east: lon,
            },
        };
        *bounds = Some(updated);
        return;
    }

    for item in items {
        collect_positions(item, bounds);
    }
}

/// Inclusive date window for observation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The trailing `days`-day window ending today.
    pub fn trailing_days(days: i64) -> Self {
        let end = Utc::now().date_naive();
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    /// Window length in whole days, never negative.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }
}

/// A single observation, normalized across providers.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub species_name: String,
    pub common_name: Option<String>,
    pub observed_at: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,
    /// Source attribution, e.g. "iNaturalist" or "eBird".
    pub source: &'static str,
}

/// Errors surfaced by observation providers.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
    #[error("unknown dataset provider: {0:?} (expected \"inaturalist\" or \"ebird\")")]
    UnknownProvider(String),
}

/// An ecological observation API, queryable by bounding box and date window.
#[async_trait]
pub trait ObservationProvider: Send + Sync + std::fmt::Debug {
    /// Fetch quality-filtered observations inside the box and window.
    async fn fetch_observations(
        &self,
        bounds: &BoundingBox,
        range: &DateRange,
        limit: usize,
    ) -> Result<Vec<Observation>, DatasetError>;

    /// Source attribution for records from this provider.
    fn source(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_contains_interior_and_edges() {
        let bbox = BoundingBox {
            south: 44.0,
            west: -79.0,
            north: 45.0,
            east: -78.0,
        };
        assert!(bbox.contains(44.5, -78.5));
        assert!(bbox.contains(44.0, -79.0));
        assert!(!bbox.contains(43.9, -78.5));
        assert!(!bbox.contains(44.5, -77.9));
    }

    #[test]
    fn trailing_days_spans_requested_window() {
        let range = DateRange::trailing_days(30);
        assert_eq!(range.days(), 30);
        assert!(range.start < range.end);
    }

    #[test]
    fn inverted_range_reports_zero_days() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        assert_eq!(range.days(), 0);
    }

    #[test]
    fn bounds_from_geojson_point() {
        let bbox =
            BoundingBox::from_geojson(r#"{"type":"Point","coordinates":[-78.3,44.3]}"#).unwrap();
        assert_eq!(bbox.south, 44.3);
        assert_eq!(bbox.north, 44.3);
        assert_eq!(bbox.west, -78.3);
        assert_eq!(bbox.east, -78.3);
    }

    #[test]
    fn bounds_from_geojson_polygon() {
        let geojson = r#"{"type":"Polygon","coordinates":[[[-79.0,44.0],[-78.0,44.0],[-78.0,45.0],[-79.0,45.0],[-79.0,44.0]]]}"#;
        let bbox = BoundingBox::from_geojson(geojson).unwrap();
        assert_eq!(bbox.south, 44.0);
        assert_eq!(bbox.north, 45.0);
        assert_eq!(bbox.west, -79.0);
        assert_eq!(bbox.east, -78.0);
    }

    #[test]
    fn bounds_from_geojson_multipolygon() {
        let geojson = r#"{"type":"MultiPolygon","coordinates":[[[[-79.0,44.0],[-78.5,44.2],[-79.0,44.0]]],[[[-78.2,44.9],[-78.1,45.1],[-78.2,44.9]]]]}"#;
        let bbox = BoundingBox::from_geojson(geojson).unwrap();
        assert_eq!(bbox.south, 44.0);
        assert_eq!(bbox.north, 45.1);
        assert_eq!(bbox.west, -79.0);
        assert_eq!(bbox.east, -78.1);
    }

    #[test]
    fn bounds_from_invalid_geojson_is_none() {
        assert!(BoundingBox::from_geojson("not json").is_none());
        assert!(BoundingBox::from_geojson(r#"{"type":"Point"}"#).is_none());
    }
}
