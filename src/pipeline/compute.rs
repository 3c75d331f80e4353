use chrono::{DateTime, Utc};

use crate::pipeline::sampler::{sample_track, SampleWindow};
use crate::pipeline::types::{ElementSet, ObjectSnapshot, OrbitalObject};
use crate::propagation::Propagator;

/// Compute one object's contribution to the cycle: a current fix plus the
/// sampled prediction window.
///
/// A failed current fix drops the object for this cycle — the geospatial
/// update and cache consumers both require it, so the object must not appear
/// at all without one. A prediction track that came back empty is fine; the
/// object is still published with what it has.
pub fn compute_object(
    propagator: &dyn Propagator,
    object: OrbitalObject,
    elements: &ElementSet,
    now: DateTime<Utc>,
    window: SampleWindow,
) -> Option<ObjectSnapshot> {
    let fix = match propagator.propagate(elements, now) {
        Ok(fix) => fix,
        Err(e) => {
            log::warn!(
                "{} (norad {}): current fix failed, dropping for this cycle: {}",
                object.name,
                object.norad_id,
                e
            );
            return None;
        }
    };

    let samples = sample_track(propagator, elements, &object.name, now, window);

    Some(ObjectSnapshot {
        object,
        fix,
        samples,
    })
}
