use chrono::{DateTime, Utc};

use crate::pipeline::{ElementSet, GeodeticFix};
use crate::propagation::error::PropagationError;
use crate::propagation::frames::{ecef_to_geodetic, teme_to_ecef_position};

/// The propagation port: element set + instant to a geodetic fix.
///
/// Implementations must be pure per call and safe to invoke from many
/// workers at once. Failure is an expected per-call outcome.
pub trait Propagator: Send + Sync {
    fn propagate(
        &self,
        elements: &ElementSet,
        at: DateTime<Utc>,
    ) -> Result<GeodeticFix, PropagationError>;
}

/// SGP4-based propagator. Parses the element set on every call so that a
/// degenerate set fails exactly the call that used it, keeping the port
/// stateless.
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(
        &self,
        set: &ElementSet,
        at: DateTime<Utc>,
    ) -> Result<GeodeticFix, PropagationError> {
        let elements = sgp4::Elements::from_tle(None, set.line1.as_bytes(), set.line2.as_bytes())
            .map_err(|e| PropagationError::InvalidElements(e.to_string()))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| PropagationError::InvalidElements(e.to_string()))?;

        let minutes = elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PropagationError::Propagation(e.to_string()))?;
        let prediction = constants
            .propagate(minutes)
            .map_err(|e| PropagationError::Propagation(e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));
        let ecef = teme_to_ecef_position(prediction.position, sidereal);
        let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(ecef);

        Ok(GeodeticFix {
            latitude_deg,
            longitude_deg,
            altitude_km,
            eci_km: prediction.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ISS_LINE1: &str = "1 25544U 98067A   20194.88612269 -.00002633  00000-0 -38515-4 0  9990";
    const ISS_LINE2: &str = "2 25544  51.6443 242.0161 0001486  45.4846 314.6316 15.49507896236000";

    fn iss() -> ElementSet {
        ElementSet {
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        }
    }

    #[test]
    fn fix_is_geodetically_plausible() {
        let at = Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap();
        let fix = Sgp4Propagator.propagate(&iss(), at).unwrap();

        assert!((-90.0..=90.0).contains(&fix.latitude_deg));
        assert!((-180.0..=180.0).contains(&fix.longitude_deg));
        // ISS orbits around 420 km
        assert!(fix.altitude_km > 300.0 && fix.altitude_km < 500.0);

        let r = (fix.eci_km[0] * fix.eci_km[0]
            + fix.eci_km[1] * fix.eci_km[1]
            + fix.eci_km[2] * fix.eci_km[2])
            .sqrt();
        assert!(r > 6600.0 && r < 6900.0);
    }

    #[test]
    fn latitude_bounded_by_inclination() {
        // The subpoint latitude can never exceed the orbital inclination.
        let mut at = Utc.with_ymd_and_hms(2020, 7, 13, 0, 0, 0).unwrap();
        for _ in 0..24 {
            let fix = Sgp4Propagator.propagate(&iss(), at).unwrap();
            assert!(fix.latitude_deg.abs() < 52.5);
            at += chrono::Duration::minutes(7);
        }
    }

    #[test]
    fn malformed_elements_are_rejected() {
        let bad = ElementSet {
            line1: "1 THIS IS NOT A TLE".to_string(),
            line2: "2 NEITHER IS THIS".to_string(),
        };
        let at = Utc.with_ymd_and_hms(2020, 7, 13, 12, 0, 0).unwrap();
        let err = Sgp4Propagator.propagate(&bad, at).unwrap_err();
        assert!(matches!(err, PropagationError::InvalidElements(_)));
    }
}
