//! Operating policies: per-kind staffing bounds, weekly hour caps and the
//! penalty weight table.
//!
//! These are plain data with spec'd defaults; the configuration crate embeds
//! them so deployments can override any value from TOML.

use serde::{Deserialize, Serialize};

use crate::domain::slot::ShiftKind;
use crate::time::MINUTES_PER_HOUR;

/// Per-kind staffing minima and maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffingPolicy {
    pub window_min: usize,
    pub window_max: usize,
    pub remote_min: usize,
    pub remote_max: usize,
}

impl StaffingPolicy {
    /// Returns `(min, max)` staffing for a shift kind.
    pub fn bounds(&self, kind: ShiftKind) -> (usize, usize) {
        match kind {
            ShiftKind::Window => (self.window_min, self.window_max),
            ShiftKind::Remote => (self.remote_min, self.remote_max),
        }
    }
}

impl Default for StaffingPolicy {
    fn default() -> Self {
        Self {
            window_min: 1,
            window_max: 2,
            remote_min: 2,
            remote_max: 4,
        }
    }
}

/// Weekly hour caps and the commuter morning cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourPolicy {
    /// Target weekly hours used by the greedy baseline when capping pools.
    pub target_hours: u32,
    /// Hard weekly maximum; hours beyond this are penalized per hour.
    pub max_hours: u32,
    /// Soft weekly floor; hours below this are penalized per hour.
    pub min_hours: u32,
    /// Commuters cannot start a shift before this minute of the day.
    pub commuter_cutoff_minute: u32,
}

impl HourPolicy {
    /// `max_hours` expressed in minutes.
    pub fn max_minutes(&self) -> u32 {
        self.max_hours * MINUTES_PER_HOUR
    }

    /// `target_hours` expressed in minutes.
    pub fn target_minutes(&self) -> u32 {
        self.target_hours * MINUTES_PER_HOUR
    }
}

impl Default for HourPolicy {
    fn default() -> Self {
        Self {
            target_hours: 15,
            max_hours: 20,
            min_hours: 14,
            commuter_cutoff_minute: 9 * MINUTES_PER_HOUR,
        }
    }
}

/// Weights for the penalty categories computed by the evaluator.
///
/// The relative ordering matters more than the absolute values: hard
/// categories (coverage, conflicts, commuter, hour cap) must dominate the
/// soft ones so that no soft improvement can mask a hard violation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    pub coverage_under: f64,
    pub coverage_over: f64,
    pub worker_conflict: f64,
    pub commuter_violation: f64,
    pub hour_over: f64,
    pub hour_under: f64,
    pub desired_deviation: f64,
    pub tier_mismatch: f64,
    pub morning_overload: f64,
    pub fairness_variance: f64,
    pub shift_length: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            coverage_under: 200.0,
            coverage_over: 50.0,
            worker_conflict: 500.0,
            commuter_violation: 300.0,
            hour_over: 100.0,
            hour_under: 10.0,
            desired_deviation: 2.0,
            tier_mismatch: 5.0,
            morning_overload: 20.0,
            fairness_variance: 1.0,
            shift_length: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staffing_bounds_per_kind() {
        let staffing = StaffingPolicy::default();
        assert_eq!(staffing.bounds(ShiftKind::Window), (1, 2));
        assert_eq!(staffing.bounds(ShiftKind::Remote), (2, 4));
    }

    #[test]
    fn hard_weights_dominate_soft() {
        let w = PenaltyWeights::default();
        let hard_floor = w
            .coverage_under
            .min(w.worker_conflict)
            .min(w.commuter_violation)
            .min(w.hour_over);
        let soft_ceiling = w
            .hour_under
            .max(w.desired_deviation)
            .max(w.tier_mismatch)
            .max(w.morning_overload)
            .max(w.fairness_variance)
            .max(w.shift_length);
        assert!(hard_floor > soft_ceiling);
    }
}
