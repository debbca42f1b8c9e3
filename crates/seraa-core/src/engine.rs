//! The SERAA engine facade.
//!
//! [`SeraaEngine`] wires a [`ConsciousLayer`] to a [`ChoiceConstraint`]:
//! every choice evaluation is handed to a built-in PAC monitor, so poor
//! or borderline results surface in the attention store.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use seraa_axioms::{
    CapabilityError, ChoiceConstraint, ChoiceDiversityTracker, ChoiceEvaluationResult,
    DiversityTrend, MoralState,
};
use seraa_monitor::{
    AttentionItem, CheckError, ConsciousLayer, ConsciousReport, Judgment, SubconsciousMonitor,
};
use seraa_ternary::TernaryValue;
use tracing::{debug, info, warn};

use crate::config::{PacMonitorConfig, SeraaConfig};
use crate::error::SeraaError;
use crate::Result;

/// Outcome of [`SeraaEngine::assess`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// The choice-preservation evaluation.
    pub result: ChoiceEvaluationResult,

    /// Value reported by the PAC monitor, if one is enabled.
    pub monitor_value: Option<TernaryValue>,

    /// Whether the PAC monitor escalated to the conscious layer.
    pub escalated: bool,

    /// Viable options have dropped several assessments in a row.
    pub erosion_alert: bool,
}

/// Judges a flat evaluation map by its `verdict` tag, so the monitor
/// agrees with the evaluator's thresholds and diversity gate.
fn judge_pac(output: &Value) -> std::result::Result<Judgment, CheckError> {
    let tag = output
        .get("verdict")
        .and_then(Value::as_str)
        .ok_or_else(|| CheckError::new("output has no verdict tag"))?;
    let verdict = tag
        .parse::<TernaryValue>()
        .map_err(|err| CheckError::new(format!("bad verdict tag: {err}")))?;
    Ok(Judgment::from(verdict))
}

fn pac_monitor(config: &PacMonitorConfig) -> Result<SubconsciousMonitor> {
    Ok(SubconsciousMonitor::new(config.name.clone(), judge_pac)?)
}

/// Configured SERAA pipeline.
///
/// # Example
///
/// ```rust
/// use seraa_core::{CapabilityError, MoralState, SeraaConfig, SeraaEngine};
/// use seraa_ternary::TernaryValue;
///
/// let engine = SeraaEngine::new(SeraaConfig::default())?;
/// let moral = MoralState::from_weights([("autonomy", 1.0)])?;
///
/// let assessment = engine.assess(
///     &moral,
///     &[0.2_f64, 0.4],
///     |s: &f64| Ok::<_, CapabilityError>(*s),
///     |_: &f64| Ok::<_, CapabilityError>(true),
/// )?;
///
/// assert_eq!(assessment.result.verdict(), TernaryValue::Negative);
/// assert!(assessment.escalated);
/// assert_eq!(engine.attention_queue().len(), 1);
/// # Ok::<(), seraa_core::SeraaError>(())
/// ```
pub struct SeraaEngine {
    config: SeraaConfig,
    layer: ConsciousLayer,
    constraint: ChoiceConstraint,
    pac_monitor: Option<Arc<SubconsciousMonitor>>,
    tracker: Mutex<ChoiceDiversityTracker>,
}

impl SeraaEngine {
    /// Create a new engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Any [`SeraaConfig::validate`] failure.
    pub fn new(config: SeraaConfig) -> Result<Self> {
        config.validate()?;

        let layer = ConsciousLayer::new(config.attention_capacity()?)?;
        let constraint = config.choice_constraint()?;

        let pac_monitor = if config.pac_monitor.enabled {
            let monitor = Arc::new(pac_monitor(&config.pac_monitor)?);
            layer.add_monitor(Arc::clone(&monitor))?;
            Some(monitor)
        } else {
            None
        };

        info!(
            "SeraaEngine initialized: capacity={}, thresholds=({}, {}), pac_monitor={}",
            layer.capacity(),
            constraint.thresholds().low(),
            constraint.thresholds().high(),
            config.pac_monitor.enabled
        );

        Ok(Self {
            config,
            layer,
            constraint,
            pac_monitor,
            tracker: Mutex::new(ChoiceDiversityTracker::default()),
        })
    }

    /// Evaluates choice preservation and routes the result through the
    /// PAC monitor.
    ///
    /// The erosion tracker only records assessments that made it through
    /// the monitor.
    ///
    /// # Errors
    ///
    /// Capability failures from the evaluation, or an escalation failure.
    pub fn assess<A, P, V>(
        &self,
        moral_state: &MoralState,
        actions: &[A],
        pac_evaluator: P,
        viability_checker: V,
    ) -> Result<Assessment>
    where
        P: Fn(&A) -> std::result::Result<f64, CapabilityError>,
        V: Fn(&A) -> std::result::Result<bool, CapabilityError>,
    {
        let result = self
            .constraint
            .evaluate(moral_state, actions, pac_evaluator, viability_checker)?;

        let monitor_value = match &self.pac_monitor {
            Some(monitor) => Some(monitor.check(&Value::Object(result.to_flat_map()))?),
            None => None,
        };

        let erosion_alert = self.lock_tracker().track(result.viable_count());
        if erosion_alert {
            warn!("Choice erosion: viable options keep shrinking");
        }
        let escalated = monitor_value.is_some_and(|v| !v.is_positive());

        debug!(
            "Assessment: verdict={} monitor={:?} escalated={}",
            result.verdict(),
            monitor_value,
            escalated
        );

        Ok(Assessment {
            result,
            monitor_value,
            escalated,
            erosion_alert,
        })
    }

    /// Registers an additional monitor with the conscious layer.
    pub fn add_monitor(&self, monitor: Arc<SubconsciousMonitor>) -> Result<()> {
        self.layer.add_monitor(monitor)?;
        Ok(())
    }

    /// Runs a registered monitor against `output`.
    ///
    /// # Errors
    ///
    /// [`SeraaError::UnknownMonitor`] if no monitor has that name.
    pub fn observe(&self, monitor_name: &str, output: &Value) -> Result<TernaryValue> {
        let monitor = self
            .layer
            .monitor(monitor_name)
            .ok_or_else(|| SeraaError::UnknownMonitor(monitor_name.to_string()))?;
        Ok(monitor.check(output)?)
    }

    /// Current attention store, in arrival order.
    pub fn attention_queue(&self) -> Vec<AttentionItem> {
        self.layer.get_attention_queue()
    }

    pub fn report(&self) -> ConsciousReport {
        self.layer.conscious_report()
    }

    /// Direction of viable-option counts across recent assessments.
    pub fn diversity_trend(&self) -> DiversityTrend {
        self.lock_tracker().trend()
    }

    /// Recent viable-option counts, oldest first.
    pub fn viable_history(&self) -> Vec<usize> {
        self.lock_tracker().history()
    }

    pub fn config(&self) -> &SeraaConfig {
        &self.config
    }

    pub fn layer(&self) -> &ConsciousLayer {
        &self.layer
    }

    /// The built-in PAC monitor, when enabled.
    pub fn pac_monitor(&self) -> Option<&Arc<SubconsciousMonitor>> {
        self.pac_monitor.as_ref()
    }

    fn lock_tracker(&self) -> std::sync::MutexGuard<'_, ChoiceDiversityTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
