//! # Conscious Layer
//!
//! Central escalation register. Holds the registered monitors and the
//! bounded [`AttentionQueue`] they escalate into.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   escalate(name, v)   ┌──────────────────────────┐
//! │  Monitor A   │ ────────────────────▶ │      LayerReceiver       │
//! ├──────────────┤                       │  Arc<Mutex<Attention>>   │
//! │  Monitor B   │ ────────────────────▶ │   (append + evict under  │
//! └──────────────┘                       │     a single lock)       │
//!        ▲                               └────────────┬─────────────┘
//!        │ add_monitor binds the sink                 │
//! ┌──────┴───────────────────────────────────────────┴─────────────┐
//! │                        ConsciousLayer                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monitors only ever see the receiver, never the layer.
//!
//! ## Concurrency
//!
//! All appends and evictions are serialized by one mutex owned by the
//! layer instance. Readers take the same lock just long enough to copy a
//! snapshot. Two monitors escalating at once are ordered by whoever
//! acquires the lock first.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use seraa_ternary::TernaryValue;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::attention::{AttentionItem, AttentionQueue};
use crate::error::{MonitorError, Result};
use crate::monitor::SubconsciousMonitor;
use crate::sink::{Escalation, EscalationSink};

type SharedQueue = Arc<Mutex<AttentionQueue>>;

fn lock(queue: &SharedQueue) -> MutexGuard<'_, AttentionQueue> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The layer's internal receiver, handed to monitors as their sink.
struct LayerReceiver {
    attention: SharedQueue,
}

impl LayerReceiver {
    /// Appends under the queue lock. Never fails.
    fn deliver(&self, monitor: &str, value: TernaryValue) {
        let mut queue = lock(&self.attention);
        if let Some(evicted) = queue.push(monitor, value) {
            debug!(
                "Attention full; evicted '{}' ({}) for '{}' ({})",
                evicted.monitor(),
                evicted.value(),
                monitor,
                value
            );
        }
    }
}

impl EscalationSink for LayerReceiver {
    fn escalate(&self, monitor: &str, value: TernaryValue) -> Result<()> {
        self.deliver(monitor, value);
        Ok(())
    }
}

/// Serializable snapshot of what currently needs attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsciousReport {
    /// Number of items in the attention store.
    pub attention_items: usize,
    /// The items, in arrival order.
    pub items: Vec<AttentionItem>,
    /// Registered monitors whose last check was optimal.
    pub subconscious_monitors: Vec<String>,
    /// Number of registered monitors.
    pub total_monitors: usize,
    /// Items evicted over the layer's lifetime.
    pub evicted: u64,
}

/// Registry of monitors plus a bounded attention store.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use seraa_monitor::{ConsciousLayer, SubconsciousMonitor};
/// use serde_json::json;
///
/// let layer = ConsciousLayer::new(5)?;
/// let ethics = Arc::new(SubconsciousMonitor::from_predicate("ethics", |out| {
///     out["score"].as_f64().is_some_and(|s| s > 0.8)
/// })?);
/// layer.add_monitor(ethics.clone())?;
///
/// ethics.check(&json!({"score": 0.2}))?;
/// assert_eq!(layer.get_attention_queue().len(), 1);
/// # Ok::<(), seraa_monitor::MonitorError>(())
/// ```
pub struct ConsciousLayer {
    monitors: RwLock<BTreeMap<String, Arc<SubconsciousMonitor>>>,
    attention: SharedQueue,
    receiver: Arc<LayerReceiver>,
}

impl ConsciousLayer {
    /// Creates a layer holding at most `max_attention_items` escalations.
    ///
    /// # Errors
    ///
    /// [`MonitorError::InvalidCapacity`] if the capacity is zero.
    pub fn new(max_attention_items: usize) -> Result<Self> {
        let attention = Arc::new(Mutex::new(AttentionQueue::new(max_attention_items)?));
        let receiver = Arc::new(LayerReceiver {
            attention: Arc::clone(&attention),
        });
        info!("ConsciousLayer created with capacity {}", max_attention_items);
        Ok(Self {
            monitors: RwLock::new(BTreeMap::new()),
            attention,
            receiver,
        })
    }

    /// Maximum number of attention items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        lock(&self.attention).capacity()
    }

    /// Registers a monitor and binds its sink to this layer.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::DuplicateMonitorName`] if the name is taken
    /// - [`MonitorError::AlreadyBound`] if the monitor already has a sink,
    ///   e.g. because another layer registered it
    ///
    /// On error the layer and the rejected monitor are left untouched.
    pub fn add_monitor(&self, monitor: Arc<SubconsciousMonitor>) -> Result<()> {
        let mut monitors = self.monitors.write().unwrap_or_else(PoisonError::into_inner);
        if monitors.contains_key(monitor.name()) {
            return Err(MonitorError::DuplicateMonitorName(monitor.name().to_string()));
        }
        if !monitor.try_bind_sink(self.sink()) {
            return Err(MonitorError::AlreadyBound(monitor.name().to_string()));
        }
        info!("Registered monitor '{}'", monitor.name());
        monitors.insert(monitor.name().to_string(), monitor);
        Ok(())
    }

    /// Deregisters a monitor. Unknown names are a no-op.
    ///
    /// The monitor's sink is unbound only while it still points at this
    /// layer; a sink bound elsewhere since registration is left alone.
    pub fn remove_monitor(&self, name: &str) -> Option<Arc<SubconsciousMonitor>> {
        let removed = self
            .monitors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        if let Some(monitor) = &removed {
            monitor.unbind_sink_if(&self.sink());
            info!("Deregistered monitor '{}'", name);
        }
        removed
    }

    /// Looks up a registered monitor.
    #[must_use]
    pub fn monitor(&self, name: &str) -> Option<Arc<SubconsciousMonitor>> {
        self.monitors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Registered monitor names, sorted.
    #[must_use]
    pub fn monitor_names(&self) -> Vec<String> {
        self.monitors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// A sink that delivers into this layer's attention store.
    ///
    /// Handed to every registered monitor; also usable by producers that
    /// are not monitors.
    #[must_use]
    pub fn sink(&self) -> Arc<dyn EscalationSink> {
        self.receiver.clone()
    }

    /// Drains a channel of escalations into the attention store.
    ///
    /// Runs until every sender is dropped. Returns how many were received.
    pub async fn receive_from(&self, mut rx: mpsc::UnboundedReceiver<Escalation>) -> usize {
        let mut received = 0;
        while let Some(escalation) = rx.recv().await {
            self.receiver.deliver(&escalation.monitor, escalation.value);
            received += 1;
        }
        debug!("Escalation channel closed after {} items", received);
        received
    }

    /// Read-only snapshot of the attention store, in arrival order.
    #[must_use]
    pub fn get_attention_queue(&self) -> Vec<AttentionItem> {
        lock(&self.attention).snapshot()
    }

    /// Marks a monitor's items as handled. Returns how many were removed.
    pub fn clear_attention(&self, monitor_name: &str) -> usize {
        lock(&self.attention).clear_monitor(monitor_name)
    }

    /// Clears every attention item.
    pub fn reset(&self) {
        lock(&self.attention).clear();
    }

    /// Snapshot of the layer's state for logging and reporting.
    #[must_use]
    pub fn conscious_report(&self) -> ConsciousReport {
        let (items, evicted) = {
            let queue = lock(&self.attention);
            (queue.snapshot(), queue.evicted_count())
        };
        let monitors = self.monitors.read().unwrap_or_else(PoisonError::into_inner);
        ConsciousReport {
            attention_items: items.len(),
            items,
            subconscious_monitors: monitors
                .values()
                .filter(|m| m.is_subconscious())
                .map(|m| m.name().to_string())
                .collect(),
            total_monitors: monitors.len(),
            evicted,
        }
    }
}

impl std::fmt::Debug for ConsciousLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsciousLayer")
            .field("monitors", &self.monitor_names())
            .field("attention", &*lock(&self.attention))
            .finish()
    }
}
