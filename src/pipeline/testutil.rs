use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::pipeline::types::{ElementSet, GeodeticFix, OrbitalObject};
use crate::propagation::{PropagationError, Propagator};

/// Deterministic propagator fake. Rejects element sets by their first line
/// and fails individual instants by unix timestamp.
pub struct ScriptedPropagator {
    pub reject_line1: Option<String>,
    pub fail_at: HashSet<i64>,
}

impl ScriptedPropagator {
    pub fn flawless() -> Self {
        Self {
            reject_line1: None,
            fail_at: HashSet::new(),
        }
    }
}

impl Propagator for ScriptedPropagator {
    fn propagate(
        &self,
        elements: &ElementSet,
        at: DateTime<Utc>,
    ) -> Result<GeodeticFix, PropagationError> {
        if self.reject_line1.as_deref() == Some(elements.line1.as_str()) {
            return Err(PropagationError::InvalidElements("scripted rejection".into()));
        }
        if self.fail_at.contains(&at.timestamp()) {
            return Err(PropagationError::Propagation("scripted failure".into()));
        }
        Ok(GeodeticFix {
            latitude_deg: (at.timestamp() % 80) as f64,
            longitude_deg: (at.timestamp() % 170) as f64,
            altitude_km: 420.0,
            eci_km: [6771.0, 0.0, 0.0],
        })
    }
}

pub fn object(id: i64) -> OrbitalObject {
    OrbitalObject {
        id,
        name: format!("SAT-{id}"),
        norad_id: 90000 + id as u32,
    }
}

pub fn elements(line1: &str) -> ElementSet {
    ElementSet {
        line1: line1.to_string(),
        line2: String::new(),
    }
}
