//! # SERAA Axioms
//!
//! Choice preservation: does a candidate action set leave meaningful
//! options open, and how evenly are they spread?
//!
//! ## Overview
//!
//! Each viable action receives a Preservation of Autonomy and Choice
//! (PAC) score in [0, 1]. The mean PAC over viable actions is classified
//! into a ternary verdict, and the spread of those scores is reported as a
//! normalized Shannon entropy.
//!
//! ## Architecture
//!
//! ```text
//! actions ──► viability_checker ──► viable actions
//!                                        │
//!                                  pac_evaluator
//!                                        ▼
//!                     ┌──────────────────┴──────────────────┐
//!                     ▼                                     ▼
//!              mean PAC vs thresholds              binned score entropy
//!                     │                                     │
//!                     └──────────► ChoiceEvaluationResult ◄─┘
//! ```
//!
//! ## Components
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`MoralState`] | Non-negative weights over moral dimensions |
//! | [`ChoiceThresholds`] | low/high bounds, optional diversity gate |
//! | [`ChoiceConstraint`] | Runs the evaluation |
//! | [`ChoiceEvaluationResult`] | Verdict, aggregate PAC, diversity |
//! | [`ChoiceDiversityTracker`] | Alerts on persistent loss of options |
//! | [`diversity`] | Entropy helpers |
//!
//! ## Security Notes
//!
//! - No viable action means NEGATIVE: the evaluation fails closed
//! - Capability failures propagate and are never coerced into a verdict
//! - PAC is only computed for viable actions

mod choice;
pub mod diversity;
mod error;
mod moral;
mod tracker;

pub use choice::{
    evaluate_choice_preservation, ChoiceConstraint, ChoiceEvaluationResult, ChoiceThresholds,
    THRESHOLD_EPSILON,
};
pub use error::{AxiomError, CapabilityError, Result};
pub use moral::MoralState;
pub use tracker::{ChoiceDiversityTracker, DiversityTrend, TREND_WINDOW};
