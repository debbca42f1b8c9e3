//! Error types for axiom evaluation.
//!
//! Caller-supplied capabilities (PAC evaluators, viability checkers) are a
//! trust boundary: their failures propagate untouched rather than being
//! folded into a verdict.

use thiserror::Error;

/// Result type alias for axiom operations.
pub type Result<T> = std::result::Result<T, AxiomError>;

/// Errors that can occur while configuring or running an axiom evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxiomError {
    /// A caller-supplied capability failed on one action.
    #[error("{capability} failed on action #{index}: {source}")]
    Capability {
        /// Which capability failed ("pac_evaluator" or "viability_checker").
        capability: &'static str,
        /// Position of the action in the input sequence.
        index: usize,
        /// The capability's own error.
        #[source]
        source: CapabilityError,
    },

    /// A PAC evaluator returned a score outside [0, 1] or a non-finite value.
    #[error("PAC score {score} for action #{index} is outside [0, 1]")]
    PacOutOfRange {
        /// Position of the action in the input sequence.
        index: usize,
        /// The offending score.
        score: f64,
    },

    /// Threshold configuration is inconsistent.
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// Diversity needs at least two bins.
    #[error("invalid bin count: {0} (must be at least 2)")]
    InvalidBinCount(usize),

    /// Moral weights must be finite and non-negative.
    #[error("invalid weight {weight} for moral dimension '{dimension}'")]
    InvalidMoralWeight {
        /// The dimension name.
        dimension: String,
        /// The rejected weight.
        weight: f64,
    },
}

/// Failure reported by a caller-supplied PAC evaluator or viability checker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CapabilityError(String);

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CapabilityError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for CapabilityError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_display() {
        let err = AxiomError::Capability {
            capability: "pac_evaluator",
            index: 2,
            source: CapabilityError::new("scorer offline"),
        };
        assert_eq!(err.to_string(), "pac_evaluator failed on action #2: scorer offline");
    }

    #[test]
    fn test_pac_out_of_range_display() {
        let err = AxiomError::PacOutOfRange { index: 0, score: 1.5 };
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_invalid_weight_display() {
        let err = AxiomError::InvalidMoralWeight {
            dimension: "care".to_string(),
            weight: -0.2,
        };
        assert!(err.to_string().contains("care"));
    }
}
