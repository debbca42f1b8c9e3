//! # SERAA Ternary
//!
//! Three-valued judgments used by every other SERAA crate.
//!
//! ## Components
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`TernaryValue`] | NEGATIVE (-1), NEUTRAL (0), POSITIVE (1) |
//! | [`TernaryValue::to_binary_pair`] | Two-bit encoding for storage/hardware |
//! | [`ternary_and`], [`ternary_or`], [`ternary_not`] | Kleene logic |
//! | [`all`], [`any`] | Folds over sequences of judgments |
//!
//! ## Quick Start
//!
//! ```rust
//! use seraa_ternary::{TernaryValue, ternary_and};
//!
//! let a = TernaryValue::value_of(0)?;
//! let b: TernaryValue = "POSITIVE".parse()?;
//!
//! assert_eq!(ternary_and(a, b), TernaryValue::Neutral);
//! assert_eq!(a | b, TernaryValue::Positive);
//! assert_eq!(!b, TernaryValue::Negative);
//! # Ok::<(), seraa_ternary::TernaryError>(())
//! ```

mod error;
mod logic;
mod value;

pub use error::{Result, TernaryError};
pub use logic::{all, any, ternary_and, ternary_not, ternary_or};
pub use value::TernaryValue;
