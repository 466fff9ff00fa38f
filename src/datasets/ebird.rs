//! eBird recent-observations client.
//!
//! Uses the region endpoint (`/v2/data/obs/{region}/recent`) with the
//! `x-ebirdapitoken` auth header, then filters to the requested bounding box
//! since the API is region-scoped rather than box-scoped.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::traits::{BoundingBox, DatasetError, DateRange, Observation, ObservationProvider};

const DEFAULT_BASE_URL: &str = "https://api.ebird.org/v2";
const ONTARIO_REGION: &str = "CA-ON";
const AUTH_HEADER: &str = "x-ebirdapitoken";

/// The API caps the look-back window at 30 days.
const MAX_BACK_DAYS: i64 = 30;
const MAX_RESULTS: usize = 1000;

#[derive(Debug)]
pub struct EBirdProvider {
    base_url: String,
    region: String,
    api_key: String,
    client: Client,
}

impl EBirdProvider {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            region: ONTARIO_REGION.to_string(),
            api_key: api_key.to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiObservation {
    #[serde(rename = "sciName")]
    sci_name: String,
    #[serde(rename = "comName")]
    com_name: Option<String>,
    #[serde(rename = "obsDt")]
    obs_dt: Option<String>,
    lat: f64,
    lng: f64,
}

fn transform(api: ApiObservation) -> Observation {
    // Observation dates arrive as "YYYY-MM-DD HH:MM"; keep the date part.
    let observed_at = api
        .obs_dt
        .as_deref()
        .map(|d| d.get(..10).unwrap_or(d))
        .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    Observation {
        species_name: api.sci_name,
        common_name: api.com_name,
        observed_at,
        latitude: api.lat,
        longitude: api.lng,
        source: "eBird",
    }
}

#[async_trait]
impl ObservationProvider for EBirdProvider {
    async fn fetch_observations(
        &self,
        bounds: &BoundingBox,
        range: &DateRange,
        limit: usize,
    ) -> Result<Vec<Observation>, DatasetError> {
        let url = format!("{}/data/obs/{}/recent", self.base_url, self.region);
        let back_days = range.days().clamp(1, MAX_BACK_DAYS);
        let max_results = limit.clamp(1, MAX_RESULTS);

        debug!("eBird query: region {}, back {back_days} day(s)", self.region);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, &self.api_key)
            .query(&[
                ("back", back_days.to_string()),
                ("maxResults", max_results.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Vec<ApiObservation> = response.json().await?;
        let observations: Vec<Observation> = body
            .into_iter()
            .map(transform)
            .filter(|obs| bounds.contains(obs.latitude, obs.longitude))
            .take(limit)
            .collect();

        debug!("eBird returned {} observation(s) inside bounds", observations.len());
        Ok(observations)
    }

    fn source(&self) -> &'static str {
        "eBird"
    }
}
