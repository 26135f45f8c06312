//! Error types for tracker operations.
//!
//! Validation and precondition failures are explicit variants; "not found"
//! on complete/delete is deliberately not represented here, those
//! operations return `Ok(false)` instead.

use thiserror::Error;

/// Errors surfaced by the operations and store layers.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Input rejected before any store mutation.
    #[error("{0}")]
    Validation(String),

    /// An operation ran against a store that has not been provisioned.
    #[error("task store is not initialized; run `init` first")]
    StoreNotInitialized,

    /// Failure inside the backing grid.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TrackerError::Validation(_))
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
