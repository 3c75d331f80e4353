mod error;
mod ingest;
mod repository;
mod sink;

pub use error::StoreError;
pub use ingest::{parse_tle_groups, IngestReport, TleIngestor};
pub use repository::{ElementRepository, PgElementRepository};
pub use sink::{GeoUpdate, GeospatialSink, PgGeospatialSink};
