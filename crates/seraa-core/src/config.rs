//! Configuration types for SERAA.
//!
//! Loaded from TOML; every section and field falls back to its default.
//!
//! ```toml
//! [attention]
//! max_attention_items = 10
//!
//! [choice]
//! low_threshold = 0.7
//! high_threshold = 0.9
//! bins = 10
//!
//! [pac_monitor]
//! enabled = true
//! name = "pac"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use seraa_axioms::{ChoiceConstraint, ChoiceThresholds};
use seraa_monitor::validate_capacity;
use tracing::info;

use crate::error::SeraaError;
use crate::Result;

/// Top-level SERAA configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeraaConfig {
    /// Conscious-layer attention store.
    pub attention: AttentionConfig,

    /// Choice-preservation evaluator.
    pub choice: ChoiceConfig,

    /// Built-in monitor over choice verdicts.
    pub pac_monitor: PacMonitorConfig,
}

/// Attention store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Capacity of the attention store. Signed so that negative values
    /// reach validation instead of failing deserialization.
    pub max_attention_items: i64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            max_attention_items: 10,
        }
    }
}

/// Choice-preservation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceConfig {
    /// Aggregate PAC at or below this is NEGATIVE.
    pub low_threshold: f64,

    /// Aggregate PAC at or above this is POSITIVE.
    pub high_threshold: f64,

    /// Optional diversity floor for a POSITIVE verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_diversity: Option<f64>,

    /// Number of fixed-width buckets for the diversity statistic.
    pub bins: usize,
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        Self {
            low_threshold: ChoiceThresholds::DEFAULT_LOW,
            high_threshold: ChoiceThresholds::DEFAULT_HIGH,
            min_diversity: None,
            bins: seraa_axioms::diversity::DEFAULT_BINS,
        }
    }
}

/// Built-in PAC monitor configuration.
///
/// The monitor reads the `verdict` of each evaluation, so its bands are
/// the `[choice]` thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacMonitorConfig {
    /// Register the monitor at engine start.
    pub enabled: bool,

    /// Monitor name in the conscious layer.
    pub name: String,
}

impl Default for PacMonitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "pac".to_string(),
        }
    }
}

impl SeraaConfig {
    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// I/O failure, malformed TOML, or any [`validate`](Self::validate) failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SeraaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| SeraaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| SeraaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SeraaError::Config(e.to_string()))
    }

    /// Runs every construction-time check up front.
    ///
    /// # Errors
    ///
    /// - [`SeraaError::Monitor`] for a non-positive capacity
    /// - [`SeraaError::Axiom`] for bad thresholds or bin count
    /// - [`SeraaError::Config`] for an unusable PAC monitor section
    pub fn validate(&self) -> Result<()> {
        self.attention_capacity()?;
        self.choice_constraint()?;
        self.validate_pac_monitor()
    }

    /// Validated attention-store capacity.
    pub fn attention_capacity(&self) -> Result<usize> {
        Ok(validate_capacity(self.attention.max_attention_items)?)
    }

    /// Builds the choice evaluator described by `[choice]`.
    pub fn choice_constraint(&self) -> Result<ChoiceConstraint> {
        let mut thresholds =
            ChoiceThresholds::new(self.choice.low_threshold, self.choice.high_threshold)?;
        if let Some(min) = self.choice.min_diversity {
            thresholds = thresholds.with_min_diversity(min)?;
        }
        Ok(ChoiceConstraint::new(thresholds).with_bins(self.choice.bins)?)
    }

    fn validate_pac_monitor(&self) -> Result<()> {
        let pac = &self.pac_monitor;
        if !pac.enabled {
            return Ok(());
        }
        if pac.name.trim().is_empty() {
            return Err(SeraaError::Config("pac_monitor.name must not be empty".into()));
        }
        Ok(())
    }
}
