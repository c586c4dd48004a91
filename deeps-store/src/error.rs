//! Store error type

use thiserror::Error;

/// Error raised by a key-value store or a typed view over it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store notifications closed")]
    Closed,
}
