//! # SERAA Monitor
//!
//! Subconscious monitoring with escalation into a bounded conscious
//! attention store.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`SubconsciousMonitor`] | Judges outputs, escalates non-optimal ones |
//! | [`EscalationSink`] | Port through which monitors escalate |
//! | [`ChannelSink`] | tokio mpsc sink for multi-task pipelines |
//! | [`AttentionQueue`] | Bounded store with severity-based eviction |
//! | [`ConsciousLayer`] | Monitor registry + thread-safe attention store |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use seraa_monitor::{ConsciousLayer, SubconsciousMonitor};
//! use seraa_ternary::TernaryValue;
//! use serde_json::json;
//!
//! let layer = ConsciousLayer::new(5)?;
//! let safety = Arc::new(SubconsciousMonitor::from_predicate("safety", |out| {
//!     out["score"].as_f64().is_some_and(|s| s > 0.9)
//! })?);
//! layer.add_monitor(safety.clone())?;
//!
//! let state = safety.check(&json!({"score": 0.5}))?;
//! assert_eq!(state, TernaryValue::Negative);
//! assert_eq!(layer.get_attention_queue()[0].monitor(), "safety");
//! # Ok::<(), seraa_monitor::MonitorError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Checker errors and panics escalate as NEGATIVE; they never pass silently
//! - Sink failures propagate to the caller of `check`
//! - The attention store never exceeds its capacity

mod attention;
mod conscious;
mod error;
mod monitor;
mod sink;

pub use attention::{validate_capacity, AttentionItem, AttentionQueue};
pub use conscious::{ConsciousLayer, ConsciousReport};
pub use error::{CheckError, MonitorError, Result};
pub use monitor::{Judgment, MonitorStatistics, SubconsciousMonitor};
pub use sink::{ChannelSink, Escalation, EscalationSink};
