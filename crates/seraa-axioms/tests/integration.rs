//! # Integration Tests
//!
//! Choice-preservation scenarios through the public API.

use seraa_axioms::{
    evaluate_choice_preservation, AxiomError, CapabilityError, ChoiceConstraint,
    ChoiceDiversityTracker, ChoiceEvaluationResult, ChoiceThresholds, DiversityTrend, MoralState,
};
use seraa_ternary::TernaryValue;

#[derive(Debug, Clone)]
struct Action {
    name: &'static str,
    pac: f64,
    viable: bool,
}

fn action(name: &'static str, pac: f64, viable: bool) -> Action {
    Action { name, pac, viable }
}

fn moral() -> MoralState {
    MoralState::from_weights([("fairness", 0.3), ("autonomy", 0.4), ("care", 0.3)]).unwrap()
}

fn run(constraint: &ChoiceConstraint, actions: &[Action]) -> ChoiceEvaluationResult {
    constraint
        .evaluate(
            &moral(),
            actions,
            |a: &Action| Ok::<_, CapabilityError>(a.pac),
            |a: &Action| Ok::<_, CapabilityError>(a.viable),
        )
        .unwrap()
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_reference_scenario_is_neutral() {
    let constraint = ChoiceConstraint::new(ChoiceThresholds::new(0.7, 0.9).unwrap());
    let actions = vec![
        action("share_data", 0.8, true),
        action("ask_consent", 0.95, true),
        action("default_opt_in", 0.75, true),
    ];

    let result = run(&constraint, &actions);

    assert_eq!(result.verdict(), TernaryValue::Neutral);
    assert!((result.aggregate_pac() - 0.8333333333333334).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&result.diversity()));
    assert!((result.diversity() - 1.0).abs() < 1e-12);
    assert!((result.max_pac() - 0.95).abs() < 1e-12);
    assert!(result.moral_entropy() > 0.9);
    assert!(result.choice_preserved());
    assert_eq!(result.viable_count(), 3);
}

#[test]
fn test_high_scores_are_positive() {
    let constraint = ChoiceConstraint::default();
    let actions = vec![action("a", 0.92, true), action("b", 0.97, true)];
    assert_eq!(run(&constraint, &actions).verdict(), TernaryValue::Positive);
}

#[test]
fn test_low_scores_are_negative() {
    let constraint = ChoiceConstraint::default();
    let actions = vec![action("a", 0.2, true), action("b", 0.4, true)];
    let result = run(&constraint, &actions);
    assert_eq!(result.verdict(), TernaryValue::Negative);
    assert!(!result.choice_preserved());
}

#[test]
fn test_all_non_viable_is_negative_even_with_perfect_scores() {
    let actions = vec![action("a", 1.0, false), action("b", 1.0, false)];
    let result = run(&ChoiceConstraint::default(), &actions);

    assert_eq!(result.verdict(), TernaryValue::Negative);
    assert_eq!(result.diversity(), 0.0);
    assert!(!result.has_viable_options());
}

#[test]
fn test_pac_never_called_for_non_viable() {
    let actions = vec![action("ok", 0.8, true), action("blocked", 0.0, false)];
    let result = ChoiceConstraint::default()
        .evaluate(
            &moral(),
            &actions,
            |a: &Action| {
                assert_ne!(a.name, "blocked");
                Ok::<_, CapabilityError>(a.pac)
            },
            |a: &Action| Ok::<_, CapabilityError>(a.viable),
        )
        .unwrap();
    assert_eq!(result.viable_count(), 1);
}

// ============================================================================
// Diversity
// ============================================================================

#[test]
fn test_identical_scores_have_zero_diversity() {
    let actions = vec![
        action("a", 0.85, true),
        action("b", 0.85, true),
        action("c", 0.85, true),
    ];
    assert_eq!(run(&ChoiceConstraint::default(), &actions).diversity(), 0.0);
}

#[test]
fn test_diversity_gate_demotes_positive() {
    let thresholds = ChoiceThresholds::new(0.5, 0.8)
        .unwrap()
        .with_min_diversity(0.5)
        .unwrap();
    let constraint = ChoiceConstraint::new(thresholds);

    let narrow = vec![action("a", 0.91, true), action("b", 0.92, true)];
    assert_eq!(run(&constraint, &narrow).verdict(), TernaryValue::Neutral);

    let spread = vec![action("a", 0.85, true), action("b", 0.95, true)];
    assert_eq!(run(&constraint, &spread).verdict(), TernaryValue::Positive);
}

#[test]
fn test_coarser_bins_merge_scores() {
    let actions = vec![action("a", 0.6, true), action("b", 0.7, true)];
    let fine = run(&ChoiceConstraint::default(), &actions);
    let coarse = run(&ChoiceConstraint::default().with_bins(2).unwrap(), &actions);

    assert!((fine.diversity() - 1.0).abs() < 1e-12);
    assert_eq!(coarse.diversity(), 0.0);
}

// ============================================================================
// Determinism and errors
// ============================================================================

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    let constraint = ChoiceConstraint::new(ChoiceThresholds::new(0.7, 0.9).unwrap());
    let actions: Vec<Action> = (0..17)
        .map(|i| action("x", f64::from(i) / 17.0, i % 3 != 0))
        .collect();

    let first = run(&constraint, &actions);
    for _ in 0..10 {
        let again = run(&constraint, &actions);
        assert_eq!(again, first);
        assert_eq!(again.aggregate_pac().to_bits(), first.aggregate_pac().to_bits());
        assert_eq!(again.diversity().to_bits(), first.diversity().to_bits());
    }
}

#[test]
fn test_capability_error_source_preserved() {
    let err = evaluate_choice_preservation(
        &moral(),
        &[action("a", 0.5, true)],
        |_: &Action| Err(CapabilityError::new("oracle offline")),
        |_: &Action| Ok(true),
    )
    .unwrap_err();

    match err {
        AxiomError::Capability { capability, source, .. } => {
            assert_eq!(capability, "pac_evaluator");
            assert_eq!(source.message(), "oracle offline");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_result_serializes_with_tag() {
    let result = run(&ChoiceConstraint::default(), &[action("a", 0.95, true)]);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["verdict"], "POSITIVE");

    let back: ChoiceEvaluationResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

// ============================================================================
// Erosion tracking
// ============================================================================

#[test]
fn test_tracker_follows_shrinking_option_sets() {
    let constraint = ChoiceConstraint::default();
    let mut tracker = ChoiceDiversityTracker::new(2);
    let mut actions = vec![
        action("a", 0.9, true),
        action("b", 0.8, true),
        action("c", 0.7, true),
    ];

    let mut alerts = Vec::new();
    for _ in 0..3 {
        let result = run(&constraint, &actions);
        alerts.push(tracker.track(result.viable_count()));
        if let Some(last) = actions.iter_mut().rev().find(|a| a.viable) {
            last.viable = false;
        }
    }

    assert_eq!(tracker.history(), vec![3, 2, 1]);
    assert_eq!(alerts, vec![false, false, true]);
    assert_eq!(tracker.trend(), DiversityTrend::Eroding);
}
