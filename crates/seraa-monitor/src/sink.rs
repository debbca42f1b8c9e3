//! Escalation sinks: the only path from a monitor to whoever is listening.
//!
//! A monitor holds an `Arc<dyn EscalationSink>` assigned after construction.
//! It never holds a reference to the layer itself, so the dependency runs
//! one way: layer → monitor, with the monitor calling back through a port.

use serde::{Deserialize, Serialize};
use seraa_ternary::TernaryValue;
use tokio::sync::mpsc;

use crate::error::{MonitorError, Result};

/// A single escalation as it travels from monitor to sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    /// Name of the monitor that raised it.
    pub monitor: String,
    /// Judgment that triggered the escalation.
    pub value: TernaryValue,
}

impl Escalation {
    pub fn new(monitor: impl Into<String>, value: TernaryValue) -> Self {
        Self {
            monitor: monitor.into(),
            value,
        }
    }
}

/// Receiver of escalations.
///
/// Implementations must be cheap and must not block. An `Err` return is
/// propagated out of the monitor's `check`.
pub trait EscalationSink: Send + Sync {
    /// Delivers one escalation.
    fn escalate(&self, monitor: &str, value: TernaryValue) -> Result<()>;
}

/// Sink that forwards escalations over an unbounded tokio channel.
///
/// Useful when monitors run in many tasks and a single consumer drains
/// into a [`ConsciousLayer`](crate::ConsciousLayer) via
/// [`receive_from`](crate::ConsciousLayer::receive_from).
///
/// # Example
///
/// ```rust
/// use seraa_monitor::{ChannelSink, EscalationSink};
/// use seraa_ternary::TernaryValue;
///
/// let (sink, mut rx) = ChannelSink::channel();
/// sink.escalate("safety", TernaryValue::Negative)?;
///
/// let received = rx.try_recv().unwrap();
/// assert_eq!(received.monitor, "safety");
/// # Ok::<(), seraa_monitor::MonitorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Escalation>,
}

impl ChannelSink {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<Escalation>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with its receiving half.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Escalation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EscalationSink for ChannelSink {
    fn escalate(&self, monitor: &str, value: TernaryValue) -> Result<()> {
        self.tx
            .send(Escalation::new(monitor, value))
            .map_err(|_| MonitorError::EscalationFailed {
                monitor: monitor.to_string(),
                reason: "escalation channel closed".to_string(),
            })
    }
}
