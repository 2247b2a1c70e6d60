//! Error types for signal construction, structural operations and codecs.

use thiserror::Error;

/// Signal error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    /// Malformed signal timing (non-ascending edges, edges outside the
    /// domain, empty or inverted domain)
    #[error("invalid signal: {0}")]
    Validation(String),

    /// Join/append operands are not adjacent or their levels disagree
    #[error("domain mismatch: {0}")]
    DomainMismatch(String),

    /// Codec, noise or correlation parameters out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// Parallel input sequences of different lengths
    #[error("length mismatch: {left} items against {right}")]
    LengthMismatch { left: usize, right: usize },

    /// More decoded symbols than a bit field can hold
    #[error("{0} symbols do not fit in a 64-bit field")]
    FieldOverflow(usize),
}

/// Result type alias for signal operations
pub type Result<T> = std::result::Result<T, SignalError>;
