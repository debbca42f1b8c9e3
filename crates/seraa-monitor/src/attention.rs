//! # Attention Store
//!
//! Bounded, arrival-ordered store of escalation records.
//!
//! ## Eviction Policy
//!
//! | Step | Rule |
//! |------|------|
//! | Order | Items are kept in arrival order; nothing is ever re-sorted |
//! | Severity | NEGATIVE > NEUTRAL > POSITIVE |
//! | Full | Before appending, evict the least severe existing item |
//! | Ties | Among equally least-severe items, the oldest goes first |
//!
//! The incoming item is always appended, even if it is itself the least
//! severe record. The store therefore never exceeds its capacity and
//! never drops a more severe record while a less severe one is held.
//!
//! ## Security Notes
//!
//! - Eviction is IRREVERSIBLE; evicted records are counted, not kept
//! - Capacity is fixed at construction and must be at least 1

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use seraa_ternary::TernaryValue;

use crate::error::{MonitorError, Result};

/// One escalated judgment awaiting attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionItem {
    monitor: String,
    value: TernaryValue,
    sequence: u64,
}

impl AttentionItem {
    /// Name of the monitor that escalated.
    #[inline]
    #[must_use]
    pub fn monitor(&self) -> &str {
        &self.monitor
    }

    /// The escalated judgment.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> TernaryValue {
        self.value
    }

    /// Arrival sequence number, unique and increasing within one store.
    #[inline]
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Severity rank: higher is more urgent. NEGATIVE = 1, NEUTRAL = 0, POSITIVE = -1.
    #[inline]
    #[must_use]
    pub const fn severity(&self) -> i8 {
        -self.value.value()
    }

    /// Flat key/value form for logging and transport.
    #[must_use]
    pub fn to_flat_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("monitor".to_string(), Value::from(self.monitor.clone()));
        map.insert("state".to_string(), Value::from(self.value.as_str()));
        map.insert("state_value".to_string(), Value::from(self.value.value()));
        map.insert("sequence".to_string(), Value::from(self.sequence));
        map
    }
}

/// Converts a signed capacity (as read from config) into a valid one.
///
/// # Errors
///
/// [`MonitorError::InvalidCapacity`] for zero or negative values.
pub fn validate_capacity(raw: i64) -> Result<usize> {
    if raw <= 0 {
        return Err(MonitorError::InvalidCapacity(raw));
    }
    usize::try_from(raw).map_err(|_| MonitorError::InvalidCapacity(raw))
}

/// Bounded store with severity-based eviction.
///
/// Not thread-safe on its own; [`ConsciousLayer`](crate::ConsciousLayer)
/// serializes access behind a single mutex.
///
/// # Example
///
/// ```rust
/// use seraa_monitor::AttentionQueue;
/// use seraa_ternary::TernaryValue;
///
/// let mut queue = AttentionQueue::new(2)?;
/// queue.push("a", TernaryValue::Negative);
/// queue.push("b", TernaryValue::Neutral);
/// let evicted = queue.push("c", TernaryValue::Negative);
///
/// assert_eq!(evicted.unwrap().monitor(), "b");
/// assert_eq!(queue.len(), 2);
/// # Ok::<(), seraa_monitor::MonitorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AttentionQueue {
    capacity: usize,
    items: VecDeque<AttentionItem>,
    next_sequence: u64,
    evicted_count: u64,
}

impl AttentionQueue {
    /// Creates a store holding at most `capacity` items.
    ///
    /// # Errors
    ///
    /// [`MonitorError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MonitorError::InvalidCapacity(0));
        }
        Ok(Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
            next_sequence: 0,
            evicted_count: 0,
        })
    }

    /// Maximum number of items held at once.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items currently held.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is held.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once `capacity` items are held.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Total items evicted over the store's lifetime.
    #[inline]
    #[must_use]
    pub const fn evicted_count(&self) -> u64 {
        self.evicted_count
    }

    /// Appends a record, evicting the least severe existing one if full.
    ///
    /// Returns the evicted item, if any.
    pub fn push(&mut self, monitor: impl Into<String>, value: TernaryValue) -> Option<AttentionItem> {
        let evicted = if self.is_full() {
            self.evict_least_severe()
        } else {
            None
        };

        let item = AttentionItem {
            monitor: monitor.into(),
            value,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.items.push_back(item);
        evicted
    }

    fn evict_least_severe(&mut self) -> Option<AttentionItem> {
        // Least severe = highest ternary value; position() picks the oldest.
        let least = self.items.iter().map(AttentionItem::value).max()?;
        let index = self.items.iter().position(|item| item.value == least)?;
        let evicted = self.items.remove(index);
        if evicted.is_some() {
            self.evicted_count += 1;
        }
        evicted
    }

    /// Iterates items in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &AttentionItem> {
        self.items.iter()
    }

    /// Copies the current items in arrival order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AttentionItem> {
        self.items.iter().cloned().collect()
    }

    /// Removes every item raised by `monitor`. Returns how many were removed.
    pub fn clear_monitor(&mut self, monitor: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.monitor != monitor);
        before - self.items.len()
    }

    /// Removes all items. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
