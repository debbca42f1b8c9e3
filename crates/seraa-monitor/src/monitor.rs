//! # Subconscious Monitor
//!
//! Wraps a private optimality checker and turns each judgment into a
//! ternary value. Non-optimal outputs are escalated through whatever sink
//! the owning layer has bound; optimal ones stay "subconscious".
//!
//! ## Judgment Mapping
//!
//! | Checker result | Value | Escalates |
//! |----------------|-------|-----------|
//! | `Optimal` / `true` | POSITIVE | no |
//! | `Borderline` | NEUTRAL | yes |
//! | `NonOptimal` / `false` | NEGATIVE | yes |
//! | error or panic | NEGATIVE | yes |
//!
//! ## Security Notes
//!
//! - Checker failures are fail-safe: they escalate, never pass silently
//! - Exactly one escalation per non-optimal check
//! - Sink failures propagate out of [`SubconsciousMonitor::check`]

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use seraa_ternary::TernaryValue;
use tracing::{debug, warn};

use crate::error::{CheckError, MonitorError, Result};
use crate::sink::EscalationSink;

/// Outcome of an optimality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgment {
    /// Output is acceptable as-is.
    Optimal,
    /// Output is acceptable but close to the line.
    Borderline,
    /// Output needs correction.
    NonOptimal,
}

impl Judgment {
    /// Ternary value reported for this judgment.
    #[must_use]
    pub const fn to_ternary(self) -> TernaryValue {
        match self {
            Self::Optimal => TernaryValue::Positive,
            Self::Borderline => TernaryValue::Neutral,
            Self::NonOptimal => TernaryValue::Negative,
        }
    }

    /// Everything short of optimal escalates.
    #[inline]
    #[must_use]
    pub const fn requires_escalation(self) -> bool {
        !matches!(self, Self::Optimal)
    }
}

/// POSITIVE is optimal, NEUTRAL borderline, NEGATIVE non-optimal.
impl From<TernaryValue> for Judgment {
    fn from(value: TernaryValue) -> Self {
        match value {
            TernaryValue::Positive => Self::Optimal,
            TernaryValue::Neutral => Self::Borderline,
            TernaryValue::Negative => Self::NonOptimal,
        }
    }
}

impl From<bool> for Judgment {
    fn from(optimal: bool) -> Self {
        if optimal {
            Self::Optimal
        } else {
            Self::NonOptimal
        }
    }
}

type Checker = dyn Fn(&Value) -> std::result::Result<Judgment, CheckError> + Send + Sync;

/// Identity of two sink handles, ignoring vtable metadata.
fn same_sink(a: &Arc<dyn EscalationSink>, b: &Arc<dyn EscalationSink>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

/// Running counters for a single monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatistics {
    /// Checks performed.
    pub total_checks: u64,
    /// Checks judged optimal.
    pub optimal: u64,
    /// Checks judged borderline.
    pub borderline: u64,
    /// Checks judged non-optimal, including failed checks.
    pub non_optimal: u64,
    /// Checks where the checker returned an error or panicked.
    pub failed_checks: u64,
    /// Escalations successfully handed to a sink.
    pub escalations: u64,
    /// Value produced by the most recent check.
    pub last_value: Option<TernaryValue>,
}

impl MonitorStatistics {
    fn rate(&self, count: u64) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            count as f64 / self.total_checks as f64
        }
    }

    /// Fraction of checks judged optimal.
    #[must_use]
    pub fn optimal_rate(&self) -> f64 {
        self.rate(self.optimal)
    }

    /// Fraction of checks judged borderline.
    #[must_use]
    pub fn borderline_rate(&self) -> f64 {
        self.rate(self.borderline)
    }

    /// Fraction of checks judged non-optimal.
    #[must_use]
    pub fn non_optimal_rate(&self) -> f64 {
        self.rate(self.non_optimal)
    }
}

/// Monitor that judges structured outputs and escalates deviations.
///
/// The escalation sink is not part of the monitor's identity. It is bound
/// by [`ConsciousLayer::add_monitor`](crate::ConsciousLayer::add_monitor)
/// or manually via [`bind_sink`](Self::bind_sink); without one, checks still
/// run and return values but nothing is escalated.
///
/// # Thread Safety
///
/// `SubconsciousMonitor` is `Send + Sync` and is normally shared as an
/// `Arc` between the layer and the producers calling [`check`](Self::check).
///
/// # Example
///
/// ```rust
/// use seraa_monitor::SubconsciousMonitor;
/// use seraa_ternary::TernaryValue;
/// use serde_json::json;
///
/// let monitor = SubconsciousMonitor::from_predicate("quality", |out| {
///     out["score"].as_f64().is_some_and(|s| s > 0.8)
/// })?;
///
/// assert_eq!(monitor.check(&json!({"score": 0.9}))?, TernaryValue::Positive);
/// assert_eq!(monitor.check(&json!({"score": 0.4}))?, TernaryValue::Negative);
/// # Ok::<(), seraa_monitor::MonitorError>(())
/// ```
pub struct SubconsciousMonitor {
    name: String,
    checker: Box<Checker>,
    sink: RwLock<Option<Arc<dyn EscalationSink>>>,
    stats: Mutex<MonitorStatistics>,
}

impl SubconsciousMonitor {
    /// Creates a monitor from a fallible checker.
    ///
    /// The checker may return anything convertible into a [`Judgment`],
    /// so both `bool` and `Judgment` work.
    ///
    /// # Errors
    ///
    /// [`MonitorError::EmptyMonitorName`] if `name` is empty or whitespace.
    pub fn new<F, J>(name: impl Into<String>, checker: F) -> Result<Self>
    where
        F: Fn(&Value) -> std::result::Result<J, CheckError> + Send + Sync + 'static,
        J: Into<Judgment>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MonitorError::EmptyMonitorName);
        }
        debug!("SubconsciousMonitor '{}' initialized", name);
        Ok(Self {
            name,
            checker: Box::new(move |output: &Value| checker(output).map(Into::into)),
            sink: RwLock::new(None),
            stats: Mutex::new(MonitorStatistics::default()),
        })
    }

    /// Creates a monitor from an infallible boolean predicate.
    pub fn from_predicate<F>(name: impl Into<String>, predicate: F) -> Result<Self>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |output| Ok::<_, CheckError>(predicate(output)))
    }

    /// Monitor name, unique within a layer.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds the escalation sink, replacing any previous one.
    pub fn bind_sink(&self, sink: Arc<dyn EscalationSink>) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    /// Removes the escalation sink. Later checks escalate nowhere.
    pub fn unbind_sink(&self) {
        *self.sink.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Binds `sink` only if no sink is bound yet. Returns whether it bound.
    pub fn try_bind_sink(&self, sink: Arc<dyn EscalationSink>) -> bool {
        let mut slot = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(sink);
        true
    }

    /// Unbinds the sink only if it is `sink` itself. Returns whether it unbound.
    pub fn unbind_sink_if(&self, sink: &Arc<dyn EscalationSink>) -> bool {
        let mut slot = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(bound) if same_sink(bound, sink) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a sink is currently bound.
    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Judges `output` and escalates if it is not optimal.
    ///
    /// # Returns
    ///
    /// The ternary value of the judgment. Checker failures yield NEGATIVE.
    ///
    /// # Errors
    ///
    /// Only the bound sink's error, if escalation fails.
    pub fn check(&self, output: &Value) -> Result<TernaryValue> {
        let (judgment, failed) = self.judge(output);
        let value = judgment.to_ternary();
        self.record(judgment, failed, value);

        if !judgment.requires_escalation() {
            return Ok(value);
        }

        // Clone the Arc so no monitor lock is held while the sink runs.
        let sink = self
            .sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match sink {
            Some(sink) => {
                debug!("Monitor '{}' escalating {}", self.name, value);
                sink.escalate(&self.name, value)?;
                self.lock_stats().escalations += 1;
            }
            None => debug!("Monitor '{}' has no sink; {} not escalated", self.name, value),
        }
        Ok(value)
    }

    fn judge(&self, output: &Value) -> (Judgment, bool) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.checker)(output)));
        match outcome {
            Ok(Ok(judgment)) => (judgment, false),
            Ok(Err(err)) => {
                warn!("Checker for '{}' failed, treating as non-optimal: {}", self.name, err);
                (Judgment::NonOptimal, true)
            }
            Err(_) => {
                warn!("Checker for '{}' panicked, treating as non-optimal", self.name);
                (Judgment::NonOptimal, true)
            }
        }
    }

    fn record(&self, judgment: Judgment, failed: bool, value: TernaryValue) {
        let mut stats = self.lock_stats();
        stats.total_checks += 1;
        match judgment {
            Judgment::Optimal => stats.optimal += 1,
            Judgment::Borderline => stats.borderline += 1,
            Judgment::NonOptimal => stats.non_optimal += 1,
        }
        if failed {
            stats.failed_checks += 1;
        }
        stats.last_value = Some(value);
    }

    fn lock_stats(&self) -> std::sync::MutexGuard<'_, MonitorStatistics> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the running counters.
    #[must_use]
    pub fn statistics(&self) -> MonitorStatistics {
        self.lock_stats().clone()
    }

    /// Value produced by the most recent check, if any.
    #[must_use]
    pub fn last_value(&self) -> Option<TernaryValue> {
        self.lock_stats().last_value
    }

    /// True while the last check was optimal, or before any check ran.
    #[must_use]
    pub fn is_subconscious(&self) -> bool {
        matches!(self.last_value(), None | Some(TernaryValue::Positive))
    }
}

impl fmt::Debug for SubconsciousMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubconsciousMonitor")
            .field("name", &self.name)
            .field("has_sink", &self.has_sink())
            .field("stats", &self.statistics())
            .finish_non_exhaustive()
    }
}
