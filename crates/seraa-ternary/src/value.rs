//! The ternary value type and its two-bit encoding.
//!
//! ## Encoding
//!
//! | Value    | Integer | Bit pair |
//! |----------|---------|----------|
//! | NEGATIVE | -1      | (0, 0)   |
//! | NEUTRAL  | 0       | (0, 1)   |
//! | POSITIVE | 1       | (1, 0)   |
//!
//! The fourth pattern `(1, 1)` is reserved. It is never produced by
//! [`TernaryValue::to_binary_pair`] and is rejected on decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TernaryError};

/// A judgment drawn from the closed set {NEGATIVE, NEUTRAL, POSITIVE}.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// NEGATIVE < NEUTRAL < POSITIVE, which the Kleene operators rely on.
///
/// # Example
///
/// ```rust
/// use seraa_ternary::TernaryValue;
///
/// let v = TernaryValue::value_of(-1)?;
/// assert_eq!(v, TernaryValue::Negative);
/// assert_eq!(TernaryValue::from_binary_pair(0, 0)?, v);
/// # Ok::<(), seraa_ternary::TernaryError>(())
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(i8)]
pub enum TernaryValue {
    /// Violation or degradation.
    Negative = -1,
    /// Baseline, unknown, or borderline.
    #[default]
    Neutral = 0,
    /// Enhancement or acceptance.
    Positive = 1,
}

impl TernaryValue {
    /// All three values in ascending order.
    pub const ALL: [TernaryValue; 3] = [Self::Negative, Self::Neutral, Self::Positive];

    /// Validated constructor from an integer.
    ///
    /// # Errors
    ///
    /// Returns [`TernaryError::InvalidTernaryValue`] for anything outside {-1, 0, 1}.
    pub fn value_of(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(Self::Negative),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Positive),
            other => Err(TernaryError::InvalidTernaryValue(other.to_string())),
        }
    }

    /// Returns the backing integer.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }

    /// Returns the upper-case tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Positive => "POSITIVE",
        }
    }

    /// Encodes as one of the three reserved bit pairs.
    #[must_use]
    pub const fn to_binary_pair(self) -> (u8, u8) {
        match self {
            Self::Negative => (0, 0),
            Self::Neutral => (0, 1),
            Self::Positive => (1, 0),
        }
    }

    /// Decodes a bit pair.
    ///
    /// # Errors
    ///
    /// Returns [`TernaryError::InvalidBinaryEncoding`] for the reserved `(1, 1)`
    /// pattern and for any bit greater than 1.
    pub fn from_binary_pair(bit0: u8, bit1: u8) -> Result<Self> {
        match (bit0, bit1) {
            (0, 0) => Ok(Self::Negative),
            (0, 1) => Ok(Self::Neutral),
            (1, 0) => Ok(Self::Positive),
            _ => Err(TernaryError::InvalidBinaryEncoding { bit0, bit1 }),
        }
    }

    /// Renders the value as a basis ket, e.g. `|-1⟩`.
    #[must_use]
    pub fn to_quantum_basis(self) -> String {
        format!("|{}⟩", self.value())
    }

    /// True for NEGATIVE.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Negative)
    }

    /// True for NEUTRAL.
    #[inline]
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// True for POSITIVE.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl fmt::Display for TernaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TernaryValue {
    type Err = TernaryError;

    /// Parses a tag (case-insensitive) or one of the integers "-1", "0", "1".
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "NEGATIVE" => Ok(Self::Negative),
            "NEUTRAL" => Ok(Self::Neutral),
            "POSITIVE" => Ok(Self::Positive),
            _ => trimmed
                .parse::<i64>()
                .map_err(|_| TernaryError::InvalidTernaryValue(s.to_string()))
                .and_then(Self::value_of),
        }
    }
}

impl TryFrom<i64> for TernaryValue {
    type Error = TernaryError;

    fn try_from(value: i64) -> Result<Self> {
        Self::value_of(value)
    }
}

impl TryFrom<i8> for TernaryValue {
    type Error = TernaryError;

    fn try_from(value: i8) -> Result<Self> {
        Self::value_of(i64::from(value))
    }
}

impl From<TernaryValue> for i8 {
    fn from(value: TernaryValue) -> Self {
        value.value()
    }
}
