//! Error types for ternary construction and decoding.

use thiserror::Error;

/// Result type alias for ternary operations.
pub type Result<T> = std::result::Result<T, TernaryError>;

/// Errors raised when a value cannot be mapped onto the ternary domain.
///
/// Both variants are fatal to the call that produced them. Nothing in this
/// crate falls back to a default value on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TernaryError {
    /// Integer or tag outside {-1, 0, 1} / {NEGATIVE, NEUTRAL, POSITIVE}.
    #[error("invalid ternary value: {0} (expected -1, 0, 1 or NEGATIVE, NEUTRAL, POSITIVE)")]
    InvalidTernaryValue(String),

    /// Bit pair that is not one of the three reserved patterns.
    #[error("invalid binary encoding: ({bit0}, {bit1})")]
    InvalidBinaryEncoding {
        /// First bit as supplied.
        bit0: u8,
        /// Second bit as supplied.
        bit1: u8,
    },
}
