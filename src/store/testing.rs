//! In-memory [`AreaStore`] double for unit tests.

use async_trait::async_trait;

use super::traits::{AreaRecord, AreaStore, AreaType, StoreError};

/// A canned-data store: name and proximity searches filter the fixture rows.
pub struct MockAreaStore {
    records: Vec<AreaRecord>,
}

impl MockAreaStore {
    pub fn new(records: Vec<AreaRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

pub fn record(name: &str, area_type: AreaType, hectares: Option<f64>) -> AreaRecord {
    AreaRecord {
        name: name.to_string(),
        official_name: format!("{name} {}", area_type.label()),
        area_type,
        designation: match area_type {
            AreaType::Park => "Natural Environment Park".to_string(),
            AreaType::Conservation => "Conservation Area".to_string(),
            AreaType::Treaty => "First Nations Territory".to_string(),
        },
        managing_authority: "Test Authority".to_string(),
        hectares,
        geometry: Some(r#"{"type":"Point","coordinates":[-78.3,44.3]}"#.to_string()),
        distance_km: None,
    }
}

fn type_matches(record: &AreaRecord, filter: Option<&[AreaType]>) -> bool {
    match filter {
        Some(types) if !types.is_empty() => types.contains(&record.area_type),
        _ => true,
    }
}

#[async_trait]
impl AreaStore for MockAreaStore {
    async fn find_by_name(
        &self,
        place_name: &str,
        area_types: Option<&[AreaType]>,
        limit: i64,
    ) -> Result<Vec<AreaRecord>, StoreError> {
        let needle = place_name.to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|r| type_matches(r, area_types))
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.official_name.to_lowercase().contains(&needle)
            })
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_nearby(
        &self,
        _latitude: f64,
        _longitude: f64,
        _radius_km: f64,
        area_types: Option<&[AreaType]>,
        limit: i64,
    ) -> Result<Vec<AreaRecord>, StoreError> {
        let mut nearby: Vec<AreaRecord> = self
            .records
            .iter()
            .filter(|r| type_matches(r, area_types))
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        for (i, record) in nearby.iter_mut().enumerate() {
            record.distance_km = Some(5.0 * (i as f64 + 1.0));
        }
        Ok(nearby)
    }

    async fn fetch_details(&self, names: &[String]) -> Result<Vec<AreaRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| names.contains(&r.name) || names.contains(&r.official_name))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
