//! Error types for monitoring and escalation.

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors raised by monitors, sinks, and the conscious layer.
///
/// # Security Notes
///
/// Escalation failures are never swallowed. A monitor whose sink fails
/// returns the error from `check` so the caller knows attention was not
/// delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Monitors must carry a non-empty name.
    #[error("monitor name must not be empty")]
    EmptyMonitorName,

    /// A monitor with this name is already registered on the layer.
    #[error("duplicate monitor name: '{0}'")]
    DuplicateMonitorName(String),

    /// The monitor already escalates into another sink (usually another
    /// layer). Remove it there first.
    #[error("monitor '{0}' is already bound to a sink")]
    AlreadyBound(String),

    /// Attention capacity must be a positive integer.
    #[error("invalid attention capacity: {0} (must be at least 1)")]
    InvalidCapacity(i64),

    /// The escalation sink could not deliver the record.
    #[error("escalation from '{monitor}' failed: {reason}")]
    EscalationFailed {
        /// Name of the escalating monitor.
        monitor: String,
        /// Why delivery failed.
        reason: String,
    },
}

/// Failure reported by an optimality checker.
///
/// Monitors never propagate this. It is converted to a fail-safe
/// NEGATIVE judgment and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CheckError(String);

impl CheckError {
    /// Creates a checker error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CheckError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for CheckError {
    fn from(message: String) -> Self {
        Self(message)
    }
}
