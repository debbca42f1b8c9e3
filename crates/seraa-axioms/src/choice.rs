//! # Choice Preservation
//!
//! Quantifies how much a candidate action set preserves meaningful
//! choice, and classifies it into a ternary verdict.
//!
//! ## Pipeline
//!
//! 1. Partition actions with the viability checker
//! 2. Score each viable action with the PAC evaluator
//! 3. Aggregate PAC = mean of viable scores (input order)
//! 4. Diversity = normalized entropy of binned scores
//!    (see [`crate::diversity`])
//! 5. Classify the aggregate against [`ChoiceThresholds`]
//!
//! With no viable action the evaluation fails closed: NEGATIVE verdict,
//! zero aggregate, zero diversity. There is no choice left to preserve.
//!
//! ## Determinism
//!
//! The evaluation is a pure function of its inputs. Scores are summed in
//! input order and the moral state iterates in sorted order, so identical
//! inputs give bit-identical results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use seraa_ternary::TernaryValue;
use tracing::{debug, warn};

use crate::diversity::{score_diversity, DEFAULT_BINS};
use crate::error::{AxiomError, CapabilityError, Result};
use crate::moral::MoralState;

/// Slack for threshold comparisons, far below any meaningful PAC difference.
pub const THRESHOLD_EPSILON: f64 = 1e-9;

/// Classification thresholds for the aggregate PAC score.
///
/// - `aggregate >= high` → POSITIVE (checked first)
/// - `aggregate <= low` → NEGATIVE
/// - otherwise → NEUTRAL
///
/// An optional `min_diversity` gate demotes a POSITIVE verdict to NEUTRAL
/// when the diversity statistic falls below it.
///
/// Comparisons allow [`THRESHOLD_EPSILON`] of slack, so a mean that lands
/// on a threshold up to rounding (three scores of 0.7 average to
/// 0.6999999999999998) counts as on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChoiceThresholds {
    low: f64,
    high: f64,
    min_diversity: Option<f64>,
}

impl ChoiceThresholds {
    /// Default low threshold.
    pub const DEFAULT_LOW: f64 = 0.7;
    /// Default high threshold.
    pub const DEFAULT_HIGH: f64 = 0.9;

    /// Creates thresholds with `0 <= low <= high <= 1`.
    ///
    /// # Errors
    ///
    /// [`AxiomError::InvalidThresholds`] if the bounds are out of order,
    /// outside [0, 1], or not finite.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
            return Err(AxiomError::InvalidThresholds(format!(
                "low ({}) and high ({}) must lie in [0, 1]",
                low, high
            )));
        }
        if low > high {
            return Err(AxiomError::InvalidThresholds(format!(
                "low ({}) exceeds high ({})",
                low, high
            )));
        }
        Ok(Self {
            low,
            high,
            min_diversity: None,
        })
    }

    /// Adds a diversity gate for POSITIVE verdicts.
    ///
    /// # Errors
    ///
    /// [`AxiomError::InvalidThresholds`] if `min_diversity` is outside [0, 1].
    pub fn with_min_diversity(mut self, min_diversity: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&min_diversity) {
            return Err(AxiomError::InvalidThresholds(format!(
                "min_diversity ({}) must lie in [0, 1]",
                min_diversity
            )));
        }
        self.min_diversity = Some(min_diversity);
        Ok(self)
    }

    /// Aggregate at or below this is NEGATIVE.
    #[inline]
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Aggregate at or above this is POSITIVE.
    #[inline]
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Diversity floor for a POSITIVE verdict, if any.
    #[inline]
    #[must_use]
    pub const fn min_diversity(&self) -> Option<f64> {
        self.min_diversity
    }

    /// Classifies an aggregate PAC score.
    #[must_use]
    pub fn classify(&self, aggregate: f64, diversity: f64) -> TernaryValue {
        if aggregate >= self.high - THRESHOLD_EPSILON {
            match self.min_diversity {
                Some(min) if diversity < min - THRESHOLD_EPSILON => TernaryValue::Neutral,
                _ => TernaryValue::Positive,
            }
        } else if aggregate <= self.low + THRESHOLD_EPSILON {
            TernaryValue::Negative
        } else {
            TernaryValue::Neutral
        }
    }
}

impl Default for ChoiceThresholds {
    fn default() -> Self {
        Self {
            low: Self::DEFAULT_LOW,
            high: Self::DEFAULT_HIGH,
            min_diversity: None,
        }
    }
}

/// Outcome of one choice-preservation evaluation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceEvaluationResult {
    verdict: TernaryValue,
    aggregate_pac: f64,
    max_pac: f64,
    diversity: f64,
    moral_entropy: f64,
    viable_count: usize,
    total_count: usize,
}

impl ChoiceEvaluationResult {
    #[inline]
    #[must_use]
    pub const fn verdict(&self) -> TernaryValue {
        self.verdict
    }

    /// Mean PAC over viable actions, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn aggregate_pac(&self) -> f64 {
        self.aggregate_pac
    }

    /// Best PAC among viable actions, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn max_pac(&self) -> f64 {
        self.max_pac
    }

    /// Normalized entropy of the binned viable PAC scores, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn diversity(&self) -> f64 {
        self.diversity
    }

    /// Normalized entropy of the moral-state weights, in [0, 1].
    #[inline]
    #[must_use]
    pub const fn moral_entropy(&self) -> f64 {
        self.moral_entropy
    }

    #[inline]
    #[must_use]
    pub const fn viable_count(&self) -> usize {
        self.viable_count
    }

    #[inline]
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total_count
    }

    #[inline]
    #[must_use]
    pub const fn has_viable_options(&self) -> bool {
        self.viable_count > 0
    }

    /// True unless the verdict is NEGATIVE.
    #[inline]
    #[must_use]
    pub const fn choice_preserved(&self) -> bool {
        !self.verdict.is_negative()
    }

    /// Flat key/value form for logging and transport.
    #[must_use]
    pub fn to_flat_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("verdict".to_string(), Value::from(self.verdict.as_str()));
        map.insert("verdict_value".to_string(), Value::from(self.verdict.value()));
        map.insert("pac_score".to_string(), Value::from(self.aggregate_pac));
        map.insert("max_pac".to_string(), Value::from(self.max_pac));
        map.insert("diversity".to_string(), Value::from(self.diversity));
        map.insert("moral_entropy".to_string(), Value::from(self.moral_entropy));
        map.insert("viable_count".to_string(), Value::from(self.viable_count));
        map.insert("total_count".to_string(), Value::from(self.total_count));
        map.insert("choice_preserved".to_string(), Value::from(self.choice_preserved()));
        map
    }
}

/// Choice-preservation evaluator.
///
/// # Example
///
/// ```rust
/// use seraa_axioms::{CapabilityError, ChoiceConstraint, ChoiceThresholds, MoralState};
/// use seraa_ternary::TernaryValue;
///
/// let moral = MoralState::from_weights([("fairness", 0.3), ("autonomy", 0.4), ("care", 0.3)])?;
/// let scores = [0.8, 0.95, 0.75];
///
/// let constraint = ChoiceConstraint::new(ChoiceThresholds::new(0.7, 0.9)?);
/// let result = constraint.evaluate(
///     &moral,
///     &scores,
///     |s: &f64| Ok::<_, CapabilityError>(*s),
///     |_: &f64| Ok::<_, CapabilityError>(true),
/// )?;
///
/// assert_eq!(result.verdict(), TernaryValue::Neutral);
/// assert!((result.aggregate_pac() - 0.8333).abs() < 1e-3);
/// # Ok::<(), seraa_axioms::AxiomError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceConstraint {
    thresholds: ChoiceThresholds,
    bins: usize,
}

impl Default for ChoiceConstraint {
    fn default() -> Self {
        Self::new(ChoiceThresholds::default())
    }
}

impl ChoiceConstraint {
    /// Creates an evaluator with [`DEFAULT_BINS`] diversity buckets.
    #[must_use]
    pub fn new(thresholds: ChoiceThresholds) -> Self {
        Self {
            thresholds,
            bins: DEFAULT_BINS,
        }
    }

    /// Sets the number of diversity buckets.
    ///
    /// # Errors
    ///
    /// [`AxiomError::InvalidBinCount`] for fewer than two buckets.
    pub fn with_bins(mut self, bins: usize) -> Result<Self> {
        if bins < 2 {
            return Err(AxiomError::InvalidBinCount(bins));
        }
        self.bins = bins;
        Ok(self)
    }

    #[must_use]
    pub const fn thresholds(&self) -> &ChoiceThresholds {
        &self.thresholds
    }

    #[must_use]
    pub const fn bins(&self) -> usize {
        self.bins
    }

    /// Evaluates a candidate action set.
    ///
    /// # Arguments
    ///
    /// * `moral_state` - Dimension weights; summarized as `moral_entropy`
    /// * `actions` - Candidate actions, in a fixed order
    /// * `pac_evaluator` - PAC score in [0, 1] for one action
    /// * `viability_checker` - Whether an action is viable at all
    ///
    /// # Errors
    ///
    /// Capability failures propagate as [`AxiomError::Capability`]; scores
    /// outside [0, 1] as [`AxiomError::PacOutOfRange`]. An empty or fully
    /// non-viable action set is NOT an error: it yields a NEGATIVE verdict.
    pub fn evaluate<A, P, V>(
        &self,
        moral_state: &MoralState,
        actions: &[A],
        pac_evaluator: P,
        viability_checker: V,
    ) -> Result<ChoiceEvaluationResult>
    where
        P: Fn(&A) -> std::result::Result<f64, CapabilityError>,
        V: Fn(&A) -> std::result::Result<bool, CapabilityError>,
    {
        let total_count = actions.len();
        let moral_entropy = moral_state.entropy();

        let mut viable = Vec::with_capacity(total_count);
        for (index, action) in actions.iter().enumerate() {
            let is_viable = viability_checker(action).map_err(|source| AxiomError::Capability {
                capability: "viability_checker",
                index,
                source,
            })?;
            if is_viable {
                viable.push((index, action));
            }
        }

        if viable.is_empty() {
            warn!(
                "No viable actions among {}; choice preservation fails closed",
                total_count
            );
            return Ok(ChoiceEvaluationResult {
                verdict: TernaryValue::Negative,
                aggregate_pac: 0.0,
                max_pac: 0.0,
                diversity: 0.0,
                moral_entropy,
                viable_count: 0,
                total_count,
            });
        }

        let mut scores = Vec::with_capacity(viable.len());
        for (index, action) in viable {
            let score = pac_evaluator(action).map_err(|source| AxiomError::Capability {
                capability: "pac_evaluator",
                index,
                source,
            })?;
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(AxiomError::PacOutOfRange { index, score });
            }
            scores.push(score);
        }

        let aggregate_pac = scores.iter().sum::<f64>() / scores.len() as f64;
        let max_pac = scores.iter().copied().fold(0.0, f64::max);
        let diversity = score_diversity(&scores, self.bins);
        let verdict = self.thresholds.classify(aggregate_pac, diversity);

        debug!(
            "Choice evaluation: verdict={} aggregate={:.4} diversity={:.4} viable={}/{}",
            verdict,
            aggregate_pac,
            diversity,
            scores.len(),
            total_count
        );

        Ok(ChoiceEvaluationResult {
            verdict,
            aggregate_pac,
            max_pac,
            diversity,
            moral_entropy,
            viable_count: scores.len(),
            total_count,
        })
    }
}

/// Convenience wrapper using default thresholds and bins.
pub fn evaluate_choice_preservation<A, P, V>(
    moral_state: &MoralState,
    actions: &[A],
    pac_evaluator: P,
    viability_checker: V,
) -> Result<ChoiceEvaluationResult>
where
    P: Fn(&A) -> std::result::Result<f64, CapabilityError>,
    V: Fn(&A) -> std::result::Result<bool, CapabilityError>,
{
    ChoiceConstraint::default().evaluate(moral_state, actions, pac_evaluator, viability_checker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Action {
        pac: f64,
        viable: bool,
    }

    fn act(pac: f64, viable: bool) -> Action {
        Action { pac, viable }
    }

    fn pac(a: &Action) -> std::result::Result<f64, CapabilityError> {
        Ok(a.pac)
    }

    fn viable(a: &Action) -> std::result::Result<bool, CapabilityError> {
        Ok(a.viable)
    }

    fn moral() -> MoralState {
        MoralState::from_weights([("fairness", 0.3), ("autonomy", 0.4), ("care", 0.3)]).unwrap()
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(ChoiceThresholds::new(0.3, 0.7).is_ok());
        assert!(ChoiceThresholds::new(0.5, 0.5).is_ok());
        assert!(matches!(
            ChoiceThresholds::new(0.8, 0.2),
            Err(AxiomError::InvalidThresholds(_))
        ));
        assert!(ChoiceThresholds::new(-0.1, 0.5).is_err());
        assert!(ChoiceThresholds::new(0.1, 1.5).is_err());
        assert!(ChoiceThresholds::new(f64::NAN, 0.5).is_err());
        assert!(ChoiceThresholds::default().with_min_diversity(2.0).is_err());
    }

    #[test]
    fn test_classify_boundaries() {
        let t = ChoiceThresholds::new(0.3, 0.7).unwrap();
        assert_eq!(t.classify(0.7, 0.0), TernaryValue::Positive);
        assert_eq!(t.classify(0.3, 0.0), TernaryValue::Negative);
        assert_eq!(t.classify(0.5, 0.0), TernaryValue::Neutral);
        assert_eq!(t.classify(0.6999, 0.0), TernaryValue::Neutral);
        assert_eq!(t.classify(0.3001, 0.0), TernaryValue::Neutral);
    }

    #[test]
    fn test_diversity_gate() {
        let t = ChoiceThresholds::new(0.3, 0.7)
            .unwrap()
            .with_min_diversity(0.5)
            .unwrap();
        assert_eq!(t.classify(0.9, 0.4), TernaryValue::Neutral);
        assert_eq!(t.classify(0.9, 0.5), TernaryValue::Positive);
        assert_eq!(t.classify(0.1, 1.0), TernaryValue::Negative);
    }

    #[test]
    fn test_bins_validation() {
        assert_eq!(
            ChoiceConstraint::default().with_bins(1).unwrap_err(),
            AxiomError::InvalidBinCount(1)
        );
        assert_eq!(ChoiceConstraint::default().with_bins(5).unwrap().bins(), 5);
    }

    #[test]
    fn test_no_viable_actions_fails_closed() {
        let actions = vec![act(0.99, false), act(0.95, false)];
        let result = ChoiceConstraint::default()
            .evaluate(&moral(), &actions, |_: &Action| panic!("never scored"), viable)
            .unwrap();

        assert_eq!(result.verdict(), TernaryValue::Negative);
        assert_eq!(result.aggregate_pac(), 0.0);
        assert_eq!(result.diversity(), 0.0);
        assert_eq!(result.viable_count(), 0);
        assert_eq!(result.total_count(), 2);
        assert!(!result.choice_preserved());
    }

    #[test]
    fn test_empty_action_set_fails_closed() {
        let actions: Vec<Action> = Vec::new();
        let result = ChoiceConstraint::default()
            .evaluate(&moral(), &actions, pac, viable)
            .unwrap();
        assert_eq!(result.verdict(), TernaryValue::Negative);
        assert_eq!(result.total_count(), 0);
    }

    #[test]
    fn test_boundary_verdicts_through_evaluate() {
        let constraint = ChoiceConstraint::new(ChoiceThresholds::new(0.3, 0.7).unwrap());
        let verdict_for = |score: f64| {
            constraint
                .evaluate(&moral(), &[act(score, true)], pac, viable)
                .unwrap()
                .verdict()
        };
        assert_eq!(verdict_for(0.7), TernaryValue::Positive);
        assert_eq!(verdict_for(0.3), TernaryValue::Negative);
        assert_eq!(verdict_for(0.5), TernaryValue::Neutral);
    }

    #[test]
    fn test_multi_action_mean_on_threshold() {
        let constraint = ChoiceConstraint::new(ChoiceThresholds::new(0.3, 0.7).unwrap());
        let evaluate_scores = |scores: &[f64]| {
            let actions: Vec<Action> = scores.iter().map(|&s| act(s, true)).collect();
            constraint
                .evaluate(&moral(), &actions, pac, viable)
                .unwrap()
        };

        // Summation lands a hair below 0.7 and above 0.3.
        let high = evaluate_scores(&[0.7, 0.7, 0.7]);
        assert!(high.aggregate_pac() < 0.7);
        assert_eq!(high.verdict(), TernaryValue::Positive);
        assert_eq!(evaluate_scores(&[0.6, 0.7, 0.8]).verdict(), TernaryValue::Positive);

        let low = evaluate_scores(&[0.2, 0.4]);
        assert!(low.aggregate_pac() > 0.3);
        assert_eq!(low.verdict(), TernaryValue::Negative);
        assert_eq!(evaluate_scores(&[0.1, 0.1, 0.4, 0.6]).verdict(), TernaryValue::Negative);
    }

    #[test]
    fn test_only_viable_actions_count() {
        let actions = vec![act(0.9, true), act(0.1, false), act(0.7, true)];
        let result = ChoiceConstraint::default()
            .evaluate(&moral(), &actions, pac, viable)
            .unwrap();

        assert_eq!(result.viable_count(), 2);
        assert_eq!(result.total_count(), 3);
        assert!((result.aggregate_pac() - 0.8).abs() < 1e-12);
        assert!((result.max_pac() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_pac_failure_propagates() {
        let actions = vec![act(0.9, true), act(0.8, true)];
        let err = ChoiceConstraint::default()
            .evaluate(
                &moral(),
                &actions,
                |a: &Action| {
                    if a.pac < 0.85 {
                        Err(CapabilityError::new("scorer crashed"))
                    } else {
                        Ok(a.pac)
                    }
                },
                viable,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            AxiomError::Capability { capability: "pac_evaluator", index: 1, .. }
        ));
    }

    #[test]
    fn test_viability_failure_propagates() {
        let actions = vec![act(0.9, true)];
        let err = ChoiceConstraint::default()
            .evaluate(&moral(), &actions, pac, |_: &Action| Err("unknown action".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            AxiomError::Capability { capability: "viability_checker", index: 0, .. }
        ));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        for bad in [1.2, -0.1, f64::NAN] {
            let err = ChoiceConstraint::default()
                .evaluate(&moral(), &[act(bad, true)], pac, viable)
                .unwrap_err();
            assert!(matches!(err, AxiomError::PacOutOfRange { index: 0, .. }));
        }
    }

    #[test]
    fn test_flat_map() {
        let result = ChoiceConstraint::default()
            .evaluate(&moral(), &[act(0.95, true)], pac, viable)
            .unwrap();
        let map = result.to_flat_map();

        assert_eq!(map["verdict"], "POSITIVE");
        assert_eq!(map["verdict_value"], 1);
        assert_eq!(map["pac_score"], 0.95);
        assert_eq!(map["viable_count"], 1);
        assert_eq!(map["choice_preserved"], true);
        assert!(map.values().all(|v| !v.is_object() && !v.is_array()));
    }

    #[test]
    fn test_convenience_function_uses_defaults() {
        let result =
            evaluate_choice_preservation(&moral(), &[act(0.8, true)], pac, viable).unwrap();
        assert_eq!(result.verdict(), TernaryValue::Neutral);
    }
}
