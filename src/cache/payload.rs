use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::CycleSnapshot;

/// The consumer-facing fleet document, exactly as cached: a single
/// `satellites` list ordered by object id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPayload {
    pub satellites: Vec<SatelliteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteEntry {
    pub id: i64,
    pub name: String,
    pub norad_id: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub eci: [f64; 3],
    pub samples: Vec<SampleEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEntry {
    pub t: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub alt_km: f64,
}

impl From<&CycleSnapshot> for FleetPayload {
    fn from(snapshot: &CycleSnapshot) -> Self {
        Self {
            satellites: snapshot
                .objects
                .iter()
                .map(|s| SatelliteEntry {
                    id: s.object.id,
                    name: s.object.name.clone(),
                    norad_id: s.object.norad_id,
                    latitude: s.fix.latitude_deg,
                    longitude: s.fix.longitude_deg,
                    altitude: s.fix.altitude_km,
                    eci: s.fix.eci_km,
                    samples: s
                        .samples
                        .iter()
                        .map(|p| SampleEntry {
                            t: p.timestamp,
                            lat: p.latitude_deg,
                            lon: p.longitude_deg,
                            alt_km: p.altitude_km,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{GeodeticFix, ObjectSnapshot, OrbitalObject, PredictionSample};
    use chrono::TimeZone;

    #[test]
    fn payload_matches_the_wire_schema() {
        let at = Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap();
        let snapshot = CycleSnapshot {
            started_at: at,
            objects: vec![ObjectSnapshot {
                object: OrbitalObject {
                    id: 42,
                    name: "ISS (ZARYA)".to_string(),
                    norad_id: 25544,
                },
                fix: GeodeticFix {
                    latitude_deg: 10.5,
                    longitude_deg: -120.25,
                    altitude_km: 421.0,
                    eci_km: [6771.0, 120.0, -45.5],
                },
                samples: vec![PredictionSample {
                    timestamp: at,
                    latitude_deg: 10.5,
                    longitude_deg: -120.25,
                    altitude_km: 421.0,
                }],
            }],
        };

        let json = serde_json::to_value(FleetPayload::from(&snapshot)).unwrap();

        let sat = &json["satellites"][0];
        assert_eq!(sat["id"], 42);
        assert_eq!(sat["name"], "ISS (ZARYA)");
        assert_eq!(sat["norad_id"], 25544);
        assert_eq!(sat["latitude"], 10.5);
        assert_eq!(sat["longitude"], -120.25);
        assert_eq!(sat["altitude"], 421.0);
        assert_eq!(sat["eci"][0], 6771.0);

        let sample = &sat["samples"][0];
        assert_eq!(sample["t"], "2020-07-13T12:00:00Z");
        assert_eq!(sample["lat"], 10.5);
        assert_eq!(sample["lon"], -120.25);
        assert_eq!(sample["alt_km"], 421.0);
    }

    #[test]
    fn empty_snapshot_serializes_to_an_empty_list() {
        let snapshot = CycleSnapshot {
            started_at: Utc::now(),
            objects: vec![],
        };
        let json = serde_json::to_string(&FleetPayload::from(&snapshot)).unwrap();
        assert_eq!(json, r#"{"satellites":[]}"#);
    }
}
