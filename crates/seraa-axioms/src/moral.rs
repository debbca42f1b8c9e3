//! Moral-state weightings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diversity::normalized_entropy;
use crate::error::{AxiomError, Result};

/// Non-negative weights over named moral dimensions (fairness, autonomy, care, ...).
///
/// Weights need not sum to 1; [`normalized`](Self::normalized) rescales
/// them. Dimensions are kept sorted so every traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct MoralState {
    weights: BTreeMap<String, f64>,
}

impl MoralState {
    /// Builds a moral state from `(dimension, weight)` pairs.
    ///
    /// Later duplicates overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// [`AxiomError::InvalidMoralWeight`] for negative or non-finite weights.
    pub fn from_weights<I, K>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (dimension, weight) in weights {
            let dimension = dimension.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(AxiomError::InvalidMoralWeight { dimension, weight });
            }
            map.insert(dimension, weight);
        }
        Ok(Self { weights: map })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Raw weight for a dimension.
    #[must_use]
    pub fn weight(&self, dimension: &str) -> Option<f64> {
        self.weights.get(dimension).copied()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Weights rescaled to sum to 1. All zeros if the total is zero.
    #[must_use]
    pub fn normalized(&self) -> BTreeMap<String, f64> {
        let total = self.total();
        self.weights
            .iter()
            .map(|(k, w)| {
                let p = if total > 0.0 { w / total } else { 0.0 };
                (k.clone(), p)
            })
            .collect()
    }

    /// Normalized entropy of the weighting in [0, 1].
    ///
    /// 1 means weight is spread evenly over every dimension; 0 means it
    /// sits on a single dimension, or there is nothing to spread.
    #[must_use]
    pub fn entropy(&self) -> f64 {
        if self.total() <= 0.0 {
            return 0.0;
        }
        normalized_entropy(self.normalized().into_values(), self.weights.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }
}

impl TryFrom<BTreeMap<String, f64>> for MoralState {
    type Error = AxiomError;

    fn try_from(weights: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_weights(weights)
    }
}

impl From<MoralState> for BTreeMap<String, f64> {
    fn from(state: MoralState) -> Self {
        state.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(matches!(
            MoralState::from_weights([("care", -0.1)]),
            Err(AxiomError::InvalidMoralWeight { .. })
        ));
        assert!(MoralState::from_weights([("care", f64::NAN)]).is_err());
        assert!(MoralState::from_weights([("care", f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_normalization() {
        let state = MoralState::from_weights([("a", 2.0), ("b", 6.0)]).unwrap();
        let normalized = state.normalized();
        assert!((normalized["a"] - 0.25).abs() < 1e-12);
        assert!((normalized["b"] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total() {
        let state = MoralState::from_weights([("a", 0.0), ("b", 0.0)]).unwrap();
        assert_eq!(state.normalized()["a"], 0.0);
        assert_eq!(state.entropy(), 0.0);
    }

    #[test]
    fn test_entropy_bounds() {
        let even = MoralState::from_weights([("a", 1.0), ("b", 1.0), ("c", 1.0)]).unwrap();
        assert!((even.entropy() - 1.0).abs() < 1e-12);

        let single = MoralState::from_weights([("a", 5.0)]).unwrap();
        assert_eq!(single.entropy(), 0.0);

        let skewed = MoralState::from_weights([("a", 0.3), ("b", 0.4), ("c", 0.3)]).unwrap();
        let h = skewed.entropy();
        assert!(h > 0.9 && h < 1.0);
    }

    #[test]
    fn test_serde_validates() {
        let state: MoralState = serde_json::from_str(r#"{"care": 0.5, "autonomy": 0.5}"#).unwrap();
        assert_eq!(state.len(), 2);
        assert!(serde_json::from_str::<MoralState>(r#"{"care": -1.0}"#).is_err());
    }
}
