//! PostGIS-backed area store.
//!
//! Each query is a `UNION ALL` over the per-type area tables, normalized to
//! one column set so a single row mapper serves every query shape. Distances
//! and areas are computed in EPSG:3347 (Statistics Canada Lambert), with
//! distances reported in kilometers and areas in hectares.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::debug;

use super::constants::{
    MAX_RESULTS, ONTARIO_CONSERVATION_AREAS_TABLE, ONTARIO_PARKS_TABLE,
    WILLIAMS_TREATY_TERRITORIES_TABLE,
};
use super::traits::{AreaRecord, AreaStore, AreaType, StoreError};

/// Projected point for a proximity search; `$1` is latitude, `$2` longitude.
const SEARCH_POINT: &str =
    "ST_Transform(ST_SetSRID(ST_MakePoint($2, $1), 4326)::geometry, 3347)";

pub struct PostgisAreaStore {
    pool: PgPool,
}

impl PostgisAreaStore {
    /// Connect a new pool against a `postgres://` URL.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// An explicit empty or absent filter means "all types".
fn resolve_types(area_types: Option<&[AreaType]>) -> &[AreaType] {
    match area_types {
        Some(types) if !types.is_empty() => types,
        _ => &AreaType::ALL,
    }
}

/// The normalized projection for one area table.
///
/// `geometry_expr` renders the geometry column, `distance_expr` the distance
/// column; both default to NULL for query shapes that do not use them.
fn select_branch(area_type: AreaType, geometry_expr: &str, distance_expr: &str) -> String {
    match area_type {
        AreaType::Park => format!(
            "SELECT name, official_name, 'park' AS area_kind, designation, \
             managing_authority, hectares, \
             ST_Area(ST_Transform(geometry::geometry, 3347)) / 10000 AS calculated_hectares, \
             {geometry_expr} AS geometry, {distance_expr} AS distance_km \
             FROM {ONTARIO_PARKS_TABLE}"
        ),
        AreaType::Conservation => format!(
            "SELECT name, official_name, 'conservation' AS area_kind, designation, \
             managing_authority, hectares, \
             ST_Area(ST_Transform(geometry::geometry, 3347)) / 10000 AS calculated_hectares, \
             {geometry_expr} AS geometry, {distance_expr} AS distance_km \
             FROM {ONTARIO_CONSERVATION_AREAS_TABLE}"
        ),
        AreaType::Treaty => format!(
            "SELECT first_nation_name AS name, first_nation_name AS official_name, \
             'treaty' AS area_kind, 'First Nations Territory' AS designation, \
             first_nation_name AS managing_authority, NULL::double precision AS hectares, \
             ST_Area(ST_Transform(geometry::geometry, 3347)) / 10000 AS calculated_hectares, \
             {geometry_expr} AS geometry, {distance_expr} AS distance_km \
             FROM {WILLIAMS_TREATY_TERRITORIES_TABLE}"
        ),
    }
}

/// Name-match predicate for one area table; `$1` is the ILIKE pattern.
fn name_predicate(area_type: AreaType) -> &'static str {
    match area_type {
        AreaType::Treaty => "first_nation_name ILIKE $1",
        _ => "(name ILIKE $1 OR official_name ILIKE $1)",
    }
}

/// Exact-name predicate for detail fetches; `$1` is a text array.
fn exact_name_predicate(area_type: AreaType) -> &'static str {
    match area_type {
        AreaType::Treaty => "first_nation_name = ANY($1)",
        _ => "(name = ANY($1) OR official_name = ANY($1))",
    }
}

fn name_search_sql(types: &[AreaType]) -> String {
    let branches: Vec<String> = types
        .iter()
        .map(|&t| {
            format!(
                "{} WHERE {}",
                select_branch(t, "ST_AsGeoJSON(geometry)", "NULL::double precision"),
                name_predicate(t)
            )
        })
        .collect();
    format!("{} ORDER BY name LIMIT $2", branches.join(" UNION ALL "))
}

fn proximity_sql(types: &[AreaType]) -> String {
    let distance = format!(
        "ST_Distance(ST_Transform(geometry::geometry, 3347), {SEARCH_POINT}) / 1000"
    );
    let branches: Vec<String> = types
        .iter()
        .map(|&t| {
            format!(
                "{} WHERE ST_DWithin(ST_Transform(geometry::geometry, 3347), {SEARCH_POINT}, $3)",
                select_branch(t, "ST_AsGeoJSON(geometry)", &distance)
            )
        })
        .collect();
    format!("{} ORDER BY distance_km LIMIT $4", branches.join(" UNION ALL "))
}

fn details_sql() -> String {
    let branches: Vec<String> = AreaType::ALL
        .iter()
        .map(|&t| {
            format!(
                "{} WHERE {}",
                select_branch(t, "ST_AsGeoJSON(ST_Centroid(geometry))", "NULL::double precision"),
                exact_name_predicate(t)
            )
        })
        .collect();
    branches.join(" UNION ALL ")
}

fn map_row(row: &sqlx::postgres::PgRow) -> Result<AreaRecord, StoreError> {
    let kind: String = row.try_get("area_kind")?;
    let area_type = kind
        .parse::<AreaType>()
        .map_err(|e| StoreError::InvalidInput(e.to_string()))?;

    let hectares: Option<f64> = row.try_get("hectares")?;
    let calculated: Option<f64> = row.try_get("calculated_hectares")?;

    Ok(AreaRecord {
        name: row.try_get("name")?,
        official_name: row.try_get("official_name")?,
        area_type,
        designation: row.try_get("designation")?,
        managing_authority: row.try_get("managing_authority")?,
        hectares: hectares.or(calculated),
        geometry: row.try_get("geometry")?,
        distance_km: row.try_get("distance_km")?,
    })
}

#[async_trait]
impl AreaStore for PostgisAreaStore {
    async fn find_by_name(
        &self,
        place_name: &str,
        area_types: Option<&[AreaType]>,
        limit: i64,
    ) -> Result<Vec<AreaRecord>, StoreError> {
        let types = resolve_types(area_types);
        let sql = name_search_sql(types);
        let pattern = format!("%{place_name}%");
        debug!("area name search: {place_name:?} over {} table(s)", types.len());

        let rows = sqlx::query(&sql)
            .bind(pattern)
            .bind(limit.clamp(1, MAX_RESULTS))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_row).collect()
    }

    async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        area_types: Option<&[AreaType]>,
        limit: i64,
    ) -> Result<Vec<AreaRecord>, StoreError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(StoreError::InvalidInput(format!(
                "coordinates out of range: ({latitude}, {longitude})"
            )));
        }

        let types = resolve_types(area_types);
        let sql = proximity_sql(types);
        debug!("proximity search: ({latitude}, {longitude}), radius {radius_km}km");

        let rows = sqlx::query(&sql)
            .bind(latitude)
            .bind(longitude)
            .bind(radius_km * 1000.0)
            .bind(limit.clamp(1, MAX_RESULTS))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_row).collect()
    }

    async fn fetch_details(&self, names: &[String]) -> Result<Vec<AreaRecord>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&details_sql())
            .bind(names)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_row).collect()
    }

    fn name(&self) -> &str {
        "postgis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_types_defaults_to_all() {
        assert_eq!(resolve_types(None), AreaType::ALL.as_slice());
        assert_eq!(resolve_types(Some(&[])), AreaType::ALL.as_slice());

        let parks = [AreaType::Park];
        assert_eq!(resolve_types(Some(&parks)), parks.as_slice());
    }

    #[test]
    fn name_search_sql_unions_requested_tables() {
        let sql = name_search_sql(&AreaType::ALL);
        assert_eq!(sql.matches("UNION ALL").count(), 2);
        assert!(sql.contains(ONTARIO_PARKS_TABLE));
        assert!(sql.contains(ONTARIO_CONSERVATION_AREAS_TABLE));
        assert!(sql.contains(WILLIAMS_TREATY_TERRITORIES_TABLE));
        assert!(sql.ends_with("ORDER BY name LIMIT $2"));
    }

    #[test]
    fn name_search_sql_single_type_has_no_union() {
        let sql = name_search_sql(&[AreaType::Park]);
        assert!(!sql.contains("UNION ALL"));
        assert!(sql.contains(ONTARIO_PARKS_TABLE));
        assert!(!sql.contains(WILLIAMS_TREATY_TERRITORIES_TABLE));
    }

    #[test]
    fn treaty_branch_surfaces_first_nation_name() {
        let sql = name_search_sql(&[AreaType::Treaty]);
        assert!(sql.contains("first_nation_name AS name"));
        assert!(sql.contains("'First Nations Territory' AS designation"));
        assert!(sql.contains("NULL::double precision AS hectares"));
        assert!(sql.contains("first_nation_name ILIKE $1"));
    }

    #[test]
    fn proximity_sql_filters_and_orders_by_distance() {
        let sql = proximity_sql(&AreaType::ALL);
        assert_eq!(sql.matches("ST_DWithin").count(), 3);
        assert!(sql.contains("ST_Distance"));
        assert!(sql.contains("3347"));
        assert!(sql.ends_with("ORDER BY distance_km LIMIT $4"));
    }

    #[test]
    fn details_sql_uses_centroid_and_exact_names() {
        let sql = details_sql();
        assert!(sql.contains("ST_Centroid"));
        assert!(sql.contains("= ANY($1)"));
        assert!(sql.contains("calculated_hectares"));
        assert_eq!(sql.matches("UNION ALL").count(), 2);
    }
}
