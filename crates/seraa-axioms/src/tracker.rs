//! Viable-option counts over time, to catch gradual choice erosion.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number of recent samples kept for [`ChoiceDiversityTracker::trend`].
pub const TREND_WINDOW: usize = 5;

/// Direction of the recent viable-option count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiversityTrend {
    /// Non-decreasing over the window (includes a flat series).
    Expanding,
    /// Mixed movement, or too few samples to tell.
    Stable,
    /// Non-increasing with at least one drop.
    Eroding,
}

impl fmt::Display for DiversityTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiversityTrend::Expanding => "expanding",
            DiversityTrend::Stable => "stable",
            DiversityTrend::Eroding => "eroding",
        };
        f.write_str(s)
    }
}

/// Records viable-action counts and alerts on persistent decrease.
///
/// Only the last [`TREND_WINDOW`] samples are retained; the decrease
/// streak is a running counter and does not need older samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceDiversityTracker {
    history: VecDeque<usize>,
    alert_threshold: usize,
    consecutive_decreases: usize,
}

impl Default for ChoiceDiversityTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALERT_THRESHOLD)
    }
}

impl ChoiceDiversityTracker {
    /// Consecutive drops that trigger an alert by default.
    pub const DEFAULT_ALERT_THRESHOLD: usize = 3;

    #[must_use]
    pub fn new(alert_threshold: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(TREND_WINDOW),
            alert_threshold,
            consecutive_decreases: 0,
        }
    }

    /// Records a sample. Returns true when corrective action is needed,
    /// i.e. the count has dropped `alert_threshold` times in a row.
    pub fn track(&mut self, viable_count: usize) -> bool {
        if let Some(&previous) = self.history.back() {
            if viable_count < previous {
                self.consecutive_decreases += 1;
            } else {
                self.consecutive_decreases = 0;
            }
        }
        while self.history.len() >= TREND_WINDOW {
            self.history.pop_front();
        }
        self.history.push_back(viable_count);

        let alert = self.consecutive_decreases >= self.alert_threshold;
        if alert {
            warn!(
                "Viable options decreased {} times in a row (now {})",
                self.consecutive_decreases, viable_count
            );
        }
        alert
    }

    /// Trend over the last five samples.
    #[must_use]
    pub fn trend(&self) -> DiversityTrend {
        if self.history.len() < 2 {
            return DiversityTrend::Stable;
        }
        let steps = || self.history.iter().zip(self.history.iter().skip(1));

        if steps().all(|(a, b)| a <= b) {
            DiversityTrend::Expanding
        } else if steps().all(|(a, b)| a >= b) {
            DiversityTrend::Eroding
        } else {
            DiversityTrend::Stable
        }
    }

    /// Retained samples, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<usize> {
        self.history.iter().copied().collect()
    }

    #[must_use]
    pub fn alert_threshold(&self) -> usize {
        self.alert_threshold
    }

    #[must_use]
    pub fn consecutive_decreases(&self) -> usize {
        self.consecutive_decreases
    }

    /// Drops all samples and the current decrease streak.
    pub fn reset(&mut self) {
        self.history.clear();
        self.consecutive_decreases = 0;
    }
}
