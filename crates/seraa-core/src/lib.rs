//! # SERAA Core
//!
//! Configuration and a single engine facade over the SERAA components.
//!
//! ## Layers
//!
//! | Layer | Crate | Role |
//! |-------|-------|------|
//! | Values | `seraa-ternary` | NEGATIVE / NEUTRAL / POSITIVE and Kleene logic |
//! | Monitoring | `seraa-monitor` | Subconscious checks, conscious attention store |
//! | Axioms | `seraa-axioms` | Choice preservation (PAC) |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     SeraaEngine                      │
//! ├──────────────────────────────────────────────────────┤
//! │                                                      │
//! │   actions ──► ChoiceConstraint ──► evaluation        │
//! │                                        │             │
//! │                                        ▼             │
//! │                                   PAC monitor        │
//! │                                        │ escalate    │
//! │                                        ▼             │
//! │   other monitors ──────────────► ConsciousLayer      │
//! │                                  (attention store)   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use seraa_core::{SeraaConfig, SeraaEngine};
//!
//! let config = SeraaConfig::load("seraa.toml")?;
//! let engine = SeraaEngine::new(config)?;
//! println!("{:?}", engine.report());
//! # Ok::<(), seraa_core::SeraaError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Configuration is validated in full before any component is built
//! - A PAC score the monitor cannot read escalates as NEGATIVE
//! - An assessment with no viable action is NEGATIVE and escalates

mod config;
mod engine;
mod error;

pub use config::{AttentionConfig, ChoiceConfig, PacMonitorConfig, SeraaConfig};
pub use engine::{Assessment, SeraaEngine};
pub use error::SeraaError;

// Re-export component types for convenience
pub use seraa_axioms::{
    CapabilityError, ChoiceEvaluationResult, ChoiceThresholds, DiversityTrend, MoralState,
};
pub use seraa_monitor::{AttentionItem, ConsciousReport, Judgment, SubconsciousMonitor};
pub use seraa_ternary::TernaryValue;

/// Core result type for SERAA operations.
pub type Result<T> = std::result::Result<T, SeraaError>;

#[cfg(test)]
mod tests;
