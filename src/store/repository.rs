use async_trait::async_trait;
use sqlx::PgPool;

use crate::pipeline::{ElementSet, OrbitalObject};
use crate::store::error::StoreError;

/// Read side of the element store: the latest-epoch element set per object.
/// Objects without any stored element set are absent from the result.
#[async_trait]
pub trait ElementRepository: Send + Sync {
    async fn current_elements(&self) -> Result<Vec<(OrbitalObject, ElementSet)>, StoreError>;
}

pub struct PgElementRepository {
    pool: PgPool,
}

impl PgElementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CURRENT_ELEMENTS_SQL: &str = r#"
SELECT s.id, s.name, s.norad_cat_id, t.line1, t.line2
FROM satellites s
JOIN (
    SELECT satellite_id, line1, line2,
           ROW_NUMBER() OVER (PARTITION BY satellite_id ORDER BY epoch DESC) AS rn
    FROM tles
) t ON s.id = t.satellite_id
WHERE t.rn = 1
"#;

#[derive(sqlx::FromRow)]
struct ElementRow {
    id: i64,
    name: String,
    norad_cat_id: i32,
    line1: String,
    line2: String,
}

#[async_trait]
impl ElementRepository for PgElementRepository {
    async fn current_elements(&self) -> Result<Vec<(OrbitalObject, ElementSet)>, StoreError> {
        let rows: Vec<ElementRow> = sqlx::query_as(CURRENT_ELEMENTS_SQL)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    OrbitalObject {
                        id: row.id,
                        name: row.name,
                        norad_id: row.norad_cat_id as u32,
                    },
                    ElementSet {
                        line1: row.line1,
                        line2: row.line2,
                    },
                )
            })
            .collect())
    }
}
