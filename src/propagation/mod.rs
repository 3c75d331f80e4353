mod error;
mod frames;
mod propagator;

pub use error::PropagationError;
pub use propagator::{Propagator, Sgp4Propagator};
