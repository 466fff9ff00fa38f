//! Area store traits and record types for protected-area lookups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three kinds of area the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Park,
    Conservation,
    Treaty,
}

impl AreaType {
    pub const ALL: [AreaType; 3] = [AreaType::Park, AreaType::Conservation, AreaType::Treaty];

    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::Park => "park",
            AreaType::Conservation => "conservation",
            AreaType::Treaty => "treaty",
        }
    }

    /// Display label used in query results.
    pub fn label(self) -> &'static str {
        match self {
            AreaType::Park => "Provincial Park",
            AreaType::Conservation => "Conservation Area",
            AreaType::Treaty => "Williams Treaty Territory",
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown area type: {0:?} (expected \"park\", \"conservation\", or \"treaty\")")]
pub struct UnknownAreaTypeError(pub String);

impl FromStr for AreaType {
    type Err = UnknownAreaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "park" => Ok(AreaType::Park),
            "conservation" => Ok(AreaType::Conservation),
            "treaty" => Ok(AreaType::Treaty),
            _ => Err(UnknownAreaTypeError(s.to_string())),
        }
    }
}

/// A single area row as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaRecord {
    pub name: String,
    pub official_name: String,
    pub area_type: AreaType,
    pub designation: String,
    pub managing_authority: String,
    pub hectares: Option<f64>,
    /// GeoJSON geometry (full shape for searches, centroid for detail fetches).
    pub geometry: Option<String>,
    /// Distance from the search center, present only for proximity results.
    pub distance_km: Option<f64>,
}

/// Errors surfaced by area store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid store input: {0}")]
    InvalidInput(String),
}

/// Geospatial record store over the Ontario area tables.
///
/// Implementations answer name lookups, point-radius proximity searches,
/// and exact-name detail fetches, each optionally filtered by area type and
/// capped at a row limit.
#[async_trait]
pub trait AreaStore: Send + Sync {
    /// Search areas whose name or official name contains `place_name`.
    async fn find_by_name(
        &self,
        place_name: &str,
        area_types: Option<&[AreaType]>,
        limit: i64,
    ) -> Result<Vec<AreaRecord>, StoreError>;

    /// Find areas within `radius_km` of a point, ordered by distance.
    async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        area_types: Option<&[AreaType]>,
        limit: i64,
    ) -> Result<Vec<AreaRecord>, StoreError>;

    /// Fetch full details for areas matched by exact name.
    async fn fetch_details(&self, names: &[String]) -> Result<Vec<AreaRecord>, StoreError>;

    /// The name of this store implementation.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_type_round_trips_through_str() {
        for area_type in AreaType::ALL {
            assert_eq!(area_type.as_str().parse::<AreaType>().unwrap(), area_type);
        }
    }

    #[test]
    fn area_type_parse_rejects_unknown() {
        assert!("national".parse::<AreaType>().is_err());
    }

    #[test]
    fn area_type_labels_match_result_vocabulary() {
        assert_eq!(AreaType::Park.label(), "Provincial Park");
        assert_eq!(AreaType::Conservation.label(), "Conservation Area");
        assert_eq!(AreaType::Treaty.label(), "Williams Treaty Territory");
    }

    #[test]
    fn area_record_serde_round_trip() {
        let record = AreaRecord {
            name: "Algonquin".into(),
            official_name: "Algonquin Provincial Park".into(),
            area_type: AreaType::Park,
            designation: "Natural Environment Park".into(),
            managing_authority: "Ontario Parks".into(),
            hectares: Some(772_300.0),
            geometry: None,
            distance_km: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: AreaRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Algonquin");
        assert_eq!(parsed.area_type, AreaType::Park);
    }
}
