//! Kleene three-valued logic over [`TernaryValue`].
//!
//! NEUTRAL behaves as "unknown": conjunction takes the minimum and
//! disjunction the maximum under NEGATIVE < NEUTRAL < POSITIVE, and
//! negation flips the sign.

use std::ops::{BitAnd, BitOr, Not};

use crate::value::TernaryValue;

impl TernaryValue {
    /// Strong Kleene conjunction (minimum).
    #[inline]
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.min(other)
    }

    /// Strong Kleene disjunction (maximum).
    #[inline]
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.max(other)
    }

    /// Negation: `-v`.
    #[inline]
    #[must_use]
    pub const fn not(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Neutral => Self::Neutral,
            Self::Positive => Self::Negative,
        }
    }
}

impl Not for TernaryValue {
    type Output = Self;

    fn not(self) -> Self {
        TernaryValue::not(self)
    }
}

impl BitAnd for TernaryValue {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl BitOr for TernaryValue {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

/// Function form of [`TernaryValue::and`].
#[inline]
#[must_use]
pub fn ternary_and(a: TernaryValue, b: TernaryValue) -> TernaryValue {
    a.and(b)
}

/// Function form of [`TernaryValue::or`].
#[inline]
#[must_use]
pub fn ternary_or(a: TernaryValue, b: TernaryValue) -> TernaryValue {
    a.or(b)
}

/// Function form of [`TernaryValue::not`].
#[inline]
#[must_use]
pub fn ternary_not(a: TernaryValue) -> TernaryValue {
    a.not()
}

/// Conjunction over a sequence. An empty sequence yields POSITIVE.
pub fn all<I>(values: I) -> TernaryValue
where
    I: IntoIterator<Item = TernaryValue>,
{
    values.into_iter().fold(TernaryValue::Positive, TernaryValue::and)
}

/// Disjunction over a sequence. An empty sequence yields NEGATIVE.
pub fn any<I>(values: I) -> TernaryValue
where
    I: IntoIterator<Item = TernaryValue>,
{
    values.into_iter().fold(TernaryValue::Negative, TernaryValue::or)
}
