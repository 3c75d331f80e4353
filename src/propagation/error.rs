use thiserror::Error;

/// Per-call failure of the propagation port. Expected and non-fatal:
/// callers drop the affected sample or object and carry on.
#[derive(Debug, Clone, Error)]
pub enum PropagationError {
    #[error("invalid element set: {0}")]
    InvalidElements(String),
    #[error("propagation failed: {0}")]
    Propagation(String),
}
