//! Error types for taste-engine
//!
//! The numerical core is total: empty pools yield `None` and missing feature
//! vectors fall back to zero. The errors below cover caller contract
//! violations and snapshot (de)serialization.

use thiserror::Error;

use crate::rating::ItemId;

/// Top-level error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TasteError {
    /// A vector or matrix did not have one entry per taste axis
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An operation referenced an item the session does not hold
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// An outcome was recorded while no pair was on offer
    #[error("No pair is currently on offer")]
    NoActivePair,

    /// Snapshot error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Error type for session snapshots
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Snapshot was written by a newer schema
    #[error("Snapshot version {0} is newer than supported")]
    VersionTooNew(u32),
}

/// Result type alias for taste-engine operations
pub type TasteResult<T> = Result<T, TasteError>;

/// Fail with [`TasteError::DimensionMismatch`] unless `actual == expected`
pub(crate) fn ensure_dimension(expected: usize, actual: usize) -> TasteResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TasteError::DimensionMismatch { expected, actual })
    }
}
