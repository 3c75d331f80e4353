use thiserror::Error;

use crate::store::StoreError;

/// Errors that abort a cycle. Everything else in the pipeline degrades to
/// an omission (a dropped sample or object) or a flag on the cycle outcome.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("element repository unavailable: {0}")]
    Repository(#[from] StoreError),
}
