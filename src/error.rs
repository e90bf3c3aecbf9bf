//! Error types for session history packet decoding.
//!
//! Decoding is deterministic over an immutable buffer, so the error surface
//! is narrow: every fatal failure is an out-of-bounds read in the header or
//! session metadata region. Array-level truncation is *not* an error — it is
//! reported as partial data via [`crate::history::DecodedArray`].
//!
//! ## Helper Constructors
//!
//! ```rust
//! use lapbook::DecodeError;
//!
//! let error = DecodeError::out_of_bounds(1436, 3, 1438);
//! assert!(error.is_fatal());
//! ```

use thiserror::Error;

/// Result type alias for decode operations.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// Main error type for session history decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(
        "Out of bounds read at offset {offset}: need {needed} bytes, buffer holds {available}"
    )]
    OutOfBounds { offset: usize, needed: usize, available: usize },
}

impl DecodeError {
    /// Helper constructor for out-of-bounds reads.
    pub fn out_of_bounds(offset: usize, needed: usize, available: usize) -> Self {
        DecodeError::OutOfBounds { offset, needed, available }
    }

    /// Returns whether this error invalidates the whole packet.
    ///
    /// Decoding is a pure function of the buffer, so retrying cannot change
    /// the outcome; every error that escapes a decoder is final. The method
    /// exists so callers can classify uniformly alongside partial-success
    /// array outcomes, which never surface as errors at all.
    pub fn is_fatal(&self) -> bool {
        match self {
            DecodeError::OutOfBounds { .. } => true,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DecodeError::OutOfBounds { .. } => vec![
                "Check the capture was not truncated mid-packet",
                "Verify the buffer holds a session history packet, not another packet type",
                "Confirm the sender uses the 2023+ packet format",
            ],
        }
    }
}
