//! Scheduling environment: the read-only problem instance (workers + slots +
//! policies) and the penalty evaluator every solver consults.
//!
//! `evaluate` is the sole source of truth for solution quality. It returns a
//! non-negative penalty (0 = perfect) as a weighted sum over the violation
//! categories, plus an integral breakdown for reporting. Hard categories are
//! weighted so that no soft improvement can mask a hard violation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::policy::{HourPolicy, PenaltyWeights};
use crate::domain::slot::{ShiftKind, SlotCatalog, TimeSlot};
use crate::domain::worker::Worker;
use crate::error::{Result, SchedulerError};
use crate::schedule::{ScheduleState, WorkerIx};

/// Run length bounds for a worker's contiguous same-kind block, in minutes.
const MIN_RUN_MINUTES: u32 = 90;
const MAX_RUN_MINUTES: u32 = 360;

/// Per-category violation counts produced alongside the penalty.
///
/// Counters are in the unit of their category: missing/excess workers for
/// coverage, occurrences for conflicts, whole hours for the hour categories.
/// `fairness_variance` carries the raw variance rather than a count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViolationBreakdown {
    pub coverage_under: u32,
    pub coverage_over: u32,
    pub worker_conflict: u32,
    pub commuter_violation: u32,
    pub hour_over: u32,
    pub hour_under: u32,
    pub desired_deviation: u32,
    pub tier_mismatch: u32,
    pub morning_overload: u32,
    pub shift_length: u32,
    pub fairness_variance: f64,
}

impl ViolationBreakdown {
    /// True when every critical category is clean. Critical means the
    /// schedule cannot ship: missing coverage, busy-time conflicts, commuter
    /// violations and hour-cap breaches.
    pub fn all_critical_pass(&self) -> bool {
        self.coverage_under == 0
            && self.worker_conflict == 0
            && self.commuter_violation == 0
            && self.hour_over == 0
    }

    /// `(name, count)` pairs for the critical categories.
    pub fn critical(&self) -> [(&'static str, u32); 4] {
        [
            ("coverage_under", self.coverage_under),
            ("worker_conflict", self.worker_conflict),
            ("commuter_violation", self.commuter_violation),
            ("hour_over", self.hour_over),
        ]
    }

    /// `(name, count)` pairs for the warning categories.
    pub fn warnings(&self) -> [(&'static str, u32); 6] {
        [
            ("coverage_over", self.coverage_over),
            ("hour_under", self.hour_under),
            ("desired_deviation", self.desired_deviation),
            ("tier_mismatch", self.tier_mismatch),
            ("morning_overload", self.morning_overload),
            ("shift_length", self.shift_length),
        ]
    }
}

/// Result of evaluating one candidate schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub penalty: f64,
    pub breakdown: ViolationBreakdown,
}

impl Evaluation {
    pub fn is_perfect(&self) -> bool {
        self.penalty == 0.0
    }
}

/// The shared, read-only problem instance.
///
/// Owns the worker and slot collections and the evaluator. Solvers hold it
/// by reference; a run never mutates it. Availability is precomputed per
/// (worker, slot) at construction.
#[derive(Debug, Clone)]
pub struct SchedulingEnvironment {
    workers: Vec<Worker>,
    slots: Vec<TimeSlot>,
    hours: HourPolicy,
    weights: PenaltyWeights,
    /// Row-major availability cache: `available[slot * num_workers + worker]`.
    available: Vec<bool>,
    /// Available worker indices per slot, roster order.
    pools: Vec<Vec<WorkerIx>>,
    /// Index pairs of distinct slots whose intervals overlap.
    overlap_pairs: Vec<(usize, usize)>,
    /// Per-slot adjacency over `overlap_pairs`.
    overlaps: Vec<Vec<usize>>,
}

impl SchedulingEnvironment {
    /// Builds an environment from a roster and a slot catalog.
    pub fn new(
        workers: Vec<Worker>,
        catalog: SlotCatalog,
        hours: HourPolicy,
        weights: PenaltyWeights,
    ) -> Result<Self> {
        Self::from_parts(workers, catalog.into_slots(), hours, weights)
    }

    /// Builds an environment from an explicit slot list. Slot indices are
    /// rewritten to match list positions.
    pub fn from_parts(
        workers: Vec<Worker>,
        mut slots: Vec<TimeSlot>,
        hours: HourPolicy,
        weights: PenaltyWeights,
    ) -> Result<Self> {
        if !workers.iter().any(|w| w.is_active) {
            return Err(SchedulerError::EmptyRoster);
        }
        let mut ids: Vec<&str> = workers.iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(dup) = ids.windows(2).find(|p| p[0] == p[1]) {
            return Err(SchedulerError::InvalidWorker {
                id: dup[0].to_string(),
                reason: "duplicate worker id".into(),
            });
        }

        for (i, slot) in slots.iter_mut().enumerate() {
            slot.index = i;
        }

        let num_workers = workers.len();
        let mut available = vec![false; slots.len() * num_workers];
        let mut pools = Vec::with_capacity(slots.len());
        for slot in &slots {
            let interval = slot.interval();
            let mut pool = Vec::new();
            for (w, worker) in workers.iter().enumerate() {
                if worker.is_available(&interval, hours.commuter_cutoff_minute) {
                    available[slot.index * num_workers + w] = true;
                    pool.push(w as WorkerIx);
                }
            }
            pools.push(pool);
        }

        let mut overlap_pairs = Vec::new();
        let mut overlaps = vec![Vec::new(); slots.len()];
        for a in 0..slots.len() {
            for b in (a + 1)..slots.len() {
                if slots[a].interval().conflicts_with(&slots[b].interval()) {
                    overlap_pairs.push((a, b));
                    overlaps[a].push(b);
                    overlaps[b].push(a);
                }
            }
        }

        Ok(Self {
            workers,
            slots,
            hours,
            weights,
            available,
            pools,
            overlap_pairs,
            overlaps,
        })
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn worker(&self, ix: WorkerIx) -> &Worker {
        &self.workers[ix as usize]
    }

    pub fn slot(&self, ix: usize) -> &TimeSlot {
        &self.slots[ix]
    }

    pub fn hour_policy(&self) -> &HourPolicy {
        &self.hours
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    /// Fresh empty candidate state sized for this instance.
    pub fn empty_state(&self) -> ScheduleState {
        ScheduleState::empty(self.slots.len(), self.workers.len())
    }

    /// Cached availability of a worker for a slot (active + commuter rule +
    /// busy intervals).
    pub fn is_worker_available(&self, worker: WorkerIx, slot: usize) -> bool {
        self.available[slot * self.workers.len() + worker as usize]
    }

    /// Active workers whose availability covers the slot, in roster order.
    pub fn available_workers(&self, slot: usize) -> &[WorkerIx] {
        &self.pools[slot]
    }

    /// Indices of the other slots whose intervals overlap this one.
    pub fn overlapping_slots(&self, slot: usize) -> &[usize] {
        &self.overlaps[slot]
    }

    /// Evaluates a candidate schedule, returning the weighted penalty and
    /// the per-category breakdown.
    pub fn evaluate(&self, state: &ScheduleState) -> Evaluation {
        let w = &self.weights;
        let mut b = ViolationBreakdown::default();
        let mut penalty = 0.0_f64;

        // Coverage per slot.
        for slot in &self.slots {
            let n = state.staff_count(slot.index);
            if n < slot.staff_min {
                let missing = (slot.staff_min - n) as u32;
                b.coverage_under += missing;
                penalty += w.coverage_under * f64::from(missing);
            } else if n > slot.staff_max {
                let excess = (n - slot.staff_max) as u32;
                b.coverage_over += excess;
                penalty += w.coverage_over * f64::from(excess);
            }
        }

        // Per-assignment checks.
        for slot in &self.slots {
            let interval = slot.interval();
            for &wix in state.assignees(slot.index) {
                let worker = &self.workers[wix as usize];
                let busy_conflict = worker.busy.iter().any(|bi| bi.conflicts_with(&interval));
                if busy_conflict || !worker.is_active {
                    b.worker_conflict += 1;
                    penalty += w.worker_conflict;
                }
                if worker.is_commuter && slot.start_minute < self.hours.commuter_cutoff_minute {
                    b.commuter_violation += 1;
                    penalty += w.commuter_violation;
                }
                let mismatch = match slot.kind {
                    ShiftKind::Window => !worker.tier.prefers_window(),
                    ShiftKind::Remote => worker.tier.prefers_window(),
                };
                if mismatch {
                    b.tier_mismatch += 1;
                    penalty += w.tier_mismatch;
                }
            }
        }

        // Double bookings: the same worker on two overlapping slots.
        for &(a, sib) in &self.overlap_pairs {
            for &wix in state.assignees(a) {
                if state.is_assigned(sib, wix) {
                    b.worker_conflict += 1;
                    penalty += w.worker_conflict;
                }
            }
        }

        // Weekly hours, deviation from desired, and fairness variance.
        let mut active_hours = Vec::with_capacity(self.workers.len());
        for (ix, worker) in self.workers.iter().enumerate() {
            let hours = state.hours_of(ix as WorkerIx);
            if hours > f64::from(self.hours.max_hours) {
                let over = hours - f64::from(self.hours.max_hours);
                b.hour_over += over.round() as u32;
                penalty += w.hour_over * over;
            }
            if !worker.is_active {
                continue;
            }
            active_hours.push(hours);
            if hours < f64::from(self.hours.min_hours) {
                let under = f64::from(self.hours.min_hours) - hours;
                b.hour_under += under.round() as u32;
                penalty += w.hour_under * under;
            }
            let deviation = (hours - f64::from(worker.desired_hours)).abs();
            b.desired_deviation += deviation.round() as u32;
            penalty += w.desired_deviation * deviation;
        }
        if !active_hours.is_empty() {
            let mean = active_hours.iter().sum::<f64>() / active_hours.len() as f64;
            let variance = active_hours
                .iter()
                .map(|h| (h - mean) * (h - mean))
                .sum::<f64>()
                / active_hours.len() as f64;
            b.fairness_variance = variance;
            penalty += w.fairness_variance * variance;
        }

        // Contiguous runs: block length bounds and pre-cutoff starts.
        let mut morning_runs: HashMap<WorkerIx, u32> = HashMap::new();
        for (wix, runs) in self.worker_runs(state) {
            for run in runs {
                let length = run.end - run.start;
                if length < MIN_RUN_MINUTES || length > MAX_RUN_MINUTES {
                    b.shift_length += 1;
                    penalty += w.shift_length;
                }
                if run.start < self.hours.commuter_cutoff_minute {
                    *morning_runs.entry(wix).or_default() += 1;
                }
            }
        }
        for (_, count) in morning_runs {
            if count > 2 {
                let excess = count - 2;
                b.morning_overload += excess;
                penalty += w.morning_overload * f64::from(excess);
            }
        }

        debug!(penalty, coverage_under = b.coverage_under, "evaluated schedule");
        Evaluation {
            penalty,
            breakdown: b,
        }
    }

    /// Slot indices with fewer assignees than their staffing minimum.
    pub fn uncovered_slots(&self, state: &ScheduleState) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| state.staff_count(s.index) < s.staff_min)
            .map(|s| s.index)
            .collect()
    }

    /// Coalesces each worker's assignments into maximal contiguous runs of
    /// the same `(date, kind)`, ordered by start time.
    pub fn worker_runs(&self, state: &ScheduleState) -> Vec<(WorkerIx, Vec<Run>)> {
        let mut per_worker: Vec<Vec<(chrono::NaiveDate, ShiftKind, u32, u32)>> =
            vec![Vec::new(); self.workers.len()];
        for slot in &self.slots {
            for &wix in state.assignees(slot.index) {
                per_worker[wix as usize].push((
                    slot.date,
                    slot.kind,
                    slot.start_minute,
                    slot.end_minute(),
                ));
            }
        }

        let mut out = Vec::new();
        for (wix, mut spans) in per_worker.into_iter().enumerate() {
            if spans.is_empty() {
                continue;
            }
            spans.sort_unstable_by_key(|&(date, kind, start, _)| (date, kind, start));
            let mut runs: Vec<Run> = Vec::new();
            for (date, kind, start, end) in spans {
                match runs.last_mut() {
                    Some(run) if run.date == date && run.kind == kind && run.end == start => {
                        run.end = end;
                    }
                    _ => runs.push(Run {
                        date,
                        kind,
                        start,
                        end,
                    }),
                }
            }
            out.push((wix as WorkerIx, runs));
        }
        out
    }
}

/// A maximal contiguous run of same-kind slots assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub date: chrono::NaiveDate,
    pub kind: ShiftKind,
    pub start: u32,
    pub end: u32,
}
