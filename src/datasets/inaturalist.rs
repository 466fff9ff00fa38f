//! iNaturalist observations client.
//!
//! Queries the public `/v1/observations` endpoint with a bounding box, a
//! date window, and the research-grade quality filter. No API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::traits::{BoundingBox, DatasetError, DateRange, Observation, ObservationProvider};

const DEFAULT_BASE_URL: &str = "https://api.inaturalist.org/v1";
const PAGE_SIZE_CAP: usize = 200;

#[derive(Debug)]
pub struct INaturalistProvider {
    base_url: String,
    client: Client,
}

impl INaturalistProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for INaturalistProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    results: Vec<ApiObservation>,
}

#[derive(Debug, Deserialize)]
struct ApiObservation {
    taxon: Option<ApiTaxon>,
    observed_on: Option<String>,
    geojson: Option<ApiPoint>,
}

#[derive(Debug, Deserialize)]
struct ApiTaxon {
    name: Option<String>,
    preferred_common_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPoint {
    /// GeoJSON order: [longitude, latitude].
    coordinates: Vec<f64>,
}

fn transform(api: ApiObservation) -> Option<Observation> {
    let point = api.geojson?;
    let (&longitude, &latitude) = match point.coordinates.as_slice() {
        [lon, lat, ..] => (lon, lat),
        _ => return None,
    };
    let taxon = api.taxon?;

    Some(Observation {
        species_name: taxon.name?,
        common_name: taxon.preferred_common_name,
        observed_at: api
            .observed_on
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        latitude,
        longitude,
        source: "iNaturalist",
    })
}

#[async_trait]
impl ObservationProvider for INaturalistProvider {
    async fn fetch_observations(
        &self,
        bounds: &BoundingBox,
        range: &DateRange,
        limit: usize,
    ) -> Result<Vec<Observation>, DatasetError> {
        let url = format!("{}/observations", self.base_url);
        let per_page = limit.clamp(1, PAGE_SIZE_CAP);

        debug!("iNaturalist query: {bounds:?}, {} day(s)", range.days());

        let response = self
            .client
            .get(&url)
            .query(&[
                ("nelat", bounds.north.to_string()),
                ("nelng", bounds.east.to_string()),
                ("swlat", bounds.south.to_string()),
                ("swlng", bounds.west.to_string()),
                ("d1", range.start.format("%Y-%m-%d").to_string()),
                ("d2", range.end.format("%Y-%m-%d").to_string()),
                ("quality_grade", "research".to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ObservationsResponse = response.json().await?;
        let observations: Vec<Observation> = body
            .results
            .into_iter()
            .filter_map(transform)
            .take(limit)
            .collect();

        debug!("iNaturalist returned {} observation(s)", observations.len());
        Ok(observations)
    }

    fn source(&self) -> &'static str {
        "iNaturalist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_observation(json: serde_json::Value) -> ApiObservation {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn transform_maps_taxon_and_coordinates() {
        let obs = transform(api_observation(serde_json::json!({
            "taxon": {"name": "Ardea herodias", "preferred_common_name": "Great Blue Heron"},
            "observed_on": "2025-06-15",
            "geojson": {"coordinates": [-78.32, 44.31]}
        })))
        .unwrap();

        assert_eq!(obs.species_name, "Ardea herodias");
        assert_eq!(obs.common_name.as_deref(), Some("Great Blue Heron"));
        assert_eq!(obs.latitude, 44.31);
        assert_eq!(obs.longitude, -78.32);
        assert_eq!(obs.source, "iNaturalist");
        assert!(obs.observed_at.is_some());
    }

    #[test]
    fn transform_drops_records_without_geometry() {
        assert!(transform(api_observation(serde_json::json!({
            "taxon": {"name": "Ardea herodias"},
            "observed_on": "2025-06-15"
        })))
        .is_none());
    }

    #[test]
    fn transform_drops_records_without_species_name() {
        assert!(transform(api_observation(serde_json::json!({
            "taxon": {"preferred_common_name": "Great Blue Heron"},
            "geojson": {"coordinates": [-78.32, 44.31]}
        })))
        .is_none());
    }

    #[test]
    fn transform_tolerates_unparseable_dates() {
        let obs = transform(api_observation(serde_json::json!({
            "taxon": {"name": "Ardea herodias"},
            "observed_on": "June 2025",
            "geojson": {"coordinates": [-78.32, 44.31]}
        })))
        .unwrap();
        assert!(obs.observed_at.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let provider = INaturalistProvider::with_base_url("https://example.test/v1/");
        assert_eq!(provider.base_url, "https://example.test/v1");
    }
}
