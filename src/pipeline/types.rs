use chrono::{DateTime, Utc};

/// A satellite as known to the element repository.
#[derive(Debug, Clone)]
pub struct OrbitalObject {
    pub id: i64,
    pub name: String,
    pub norad_id: u32,
}

/// Two-line element set text. Always the latest-epoch set for its object;
/// the pipeline never inspects it beyond handing it to the propagation port.
#[derive(Debug, Clone)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
}

/// Current position of an object: geodetic subpoint plus the inertial
/// (TEME) position vector it was derived from.
#[derive(Debug, Clone, Copy)]
pub struct GeodeticFix {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub eci_km: [f64; 3],
}

/// One point of a predicted ground track.
#[derive(Debug, Clone, Copy)]
pub struct PredictionSample {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Everything one cycle produced for one object. `samples` may be empty
/// when prediction failed outright; `fix` is always present, since objects
/// without a current fix are dropped from the cycle instead.
#[derive(Debug, Clone)]
pub struct ObjectSnapshot {
    pub object: OrbitalObject,
    pub fix: GeodeticFix,
    pub samples: Vec<PredictionSample>,
}

/// The consolidated output of one cycle, ordered by object id. Published
/// atomically or not at all.
#[derive(Debug, Clone)]
pub struct CycleSnapshot {
    pub started_at: DateTime<Utc>,
    pub objects: Vec<ObjectSnapshot>,
}

impl CycleSnapshot {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
