mod compute;
mod error;
mod fanout;
mod sampler;
mod scheduler;
#[cfg(test)]
mod testutil;
mod types;

pub use compute::compute_object;
pub use error::CycleError;
pub use fanout::compute_fleet;
pub use sampler::{sample_track, SampleWindow};
pub use scheduler::{CycleOutcome, CycleScheduler, CycleState};
pub use types::{
    CycleSnapshot, ElementSet, GeodeticFix, ObjectSnapshot, OrbitalObject, PredictionSample,
};
