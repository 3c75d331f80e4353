mod error;
mod payload;
mod snapshot;

pub use error::CacheError;
pub use payload::{FleetPayload, SampleEntry, SatelliteEntry};
pub use snapshot::{RedisSnapshotCache, SnapshotCache};
