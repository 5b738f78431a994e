// model = "claude-opus-4-5"
// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Error types shared by every sequence in the crate.

use thiserror::Error;

/// Result type alias using [`SeqError`].
pub type Result<T> = std::result::Result<T, SeqError>;

/// Errors surfaced by blocks, block lists and traversals.
///
/// None of these are retried internally. `CapacityExceeded` and
/// `InternalInvariantViolation` indicate a defect in the engine itself and
/// must not be swallowed by callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// The requested position is outside the domain of the operation.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The rejected position.
        index: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },

    /// A block was asked to hold more than its configured maximum.
    #[error("block capacity {capacity} exceeded")]
    CapacityExceeded {
        /// The block's maximum element count.
        capacity: usize,
    },

    /// A traversal observed a structural mutation between two steps.
    #[error("sequence modified during traversal (expected version {expected}, found {found})")]
    ConcurrentStructuralChange {
        /// Version captured when the traversal started.
        expected: u64,
        /// Version observed at the failing step.
        found: u64,
    },

    /// The structural verifier found corrupted bookkeeping.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// Block bounds rejected by [`crate::config::BlockConfig::validate`].
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SeqError {
    /// Build an `IndexOutOfRange` error.
    pub fn out_of_range(index: usize, len: usize) -> SeqError {
        return SeqError::IndexOutOfRange { index, len };
    }

    /// Build an `InternalInvariantViolation` error.
    pub fn invariant(detail: impl Into<String>) -> SeqError {
        return SeqError::InternalInvariantViolation(detail.into());
    }

    /// Whether this error signals an engine defect rather than a caller mistake.
    pub fn is_fatal(&self) -> bool {
        return matches!(
            self,
            SeqError::CapacityExceeded { .. } | SeqError::InternalInvariantViolation(_)
        );
    }
}

/// Check `index < len`, the domain of get/set/remove.
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(SeqError::out_of_range(index, len));
    }
    return Ok(());
}

/// Check `index <= len`, the domain of insert.
#[inline]
pub(crate) fn check_insert_index(index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(SeqError::out_of_range(index, len));
    }
    return Ok(());
}

/// Check `from <= to <= len`.
#[inline]
pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
    if to > len {
        return Err(SeqError::out_of_range(to, len));
    }
    if from > to {
        return Err(SeqError::out_of_range(from, to));
    }
    return Ok(());
}
