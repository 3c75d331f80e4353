use async_trait::async_trait;
use sqlx::PgPool;

use crate::store::error::StoreError;

/// One object's geographic position heading back into the store.
#[derive(Debug, Clone, Copy)]
pub struct GeoUpdate {
    pub object_id: i64,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
}

/// Write side of the store: mirrors each object's current subpoint into the
/// geospatial column as a single batch per cycle.
#[async_trait]
pub trait GeospatialSink: Send + Sync {
    async fn persist(&self, updates: &[GeoUpdate]) -> Result<(), StoreError>;
}

pub struct PgGeospatialSink {
    pool: PgPool,
}

impl PgGeospatialSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// SRID 4326, longitude first, rows matched in place by id.
const UPDATE_GEOPOINTS_SQL: &str = r#"
UPDATE satellites s
SET geopoint = ST_SetSRID(ST_MakePoint(u.lon, u.lat), 4326)
FROM UNNEST($1::float8[], $2::float8[], $3::bigint[]) AS u(lon, lat, id)
WHERE s.id = u.id
"#;

#[async_trait]
impl GeospatialSink for PgGeospatialSink {
    async fn persist(&self, updates: &[GeoUpdate]) -> Result<(), StoreError> {
        if updates.is_empty() {
            return Ok(());
        }

        let lons: Vec<f64> = updates.iter().map(|u| u.longitude_deg).collect();
        let lats: Vec<f64> = updates.iter().map(|u| u.latitude_deg).collect();
        let ids: Vec<i64> = updates.iter().map(|u| u.object_id).collect();

        sqlx::query(UPDATE_GEOPOINTS_SQL)
            .bind(lons)
            .bind(lats)
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
