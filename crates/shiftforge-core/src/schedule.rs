//! Mutable solver state: per-slot assignee sets plus an incrementally
//! maintained per-worker minute tally.
//!
//! The state is a fixed-shape array indexed by slot position. Hard
//! constraints are *not* enforced here; the evaluator reports violations and
//! the moves decide what is eligible. Assignee sets are kept sorted so that
//! two states built through different move sequences compare equal when they
//! describe the same schedule.

use smallvec::SmallVec;

use crate::domain::slot::TimeSlot;

/// Dense index into the environment's worker list.
pub type WorkerIx = u16;

/// One candidate assignment: `assignees[slot.index]` holds the workers on
/// that slot, and `minutes[worker]` the worker's assigned minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    assignees: Vec<SmallVec<[WorkerIx; 4]>>,
    minutes: Vec<u32>,
}

impl ScheduleState {
    /// Creates an empty state for `num_slots` slots and `num_workers`
    /// workers.
    pub fn empty(num_slots: usize, num_workers: usize) -> Self {
        Self {
            assignees: vec![SmallVec::new(); num_slots],
            minutes: vec![0; num_workers],
        }
    }

    pub fn num_slots(&self) -> usize {
        self.assignees.len()
    }

    /// Workers currently on a slot, sorted by index.
    pub fn assignees(&self, slot: usize) -> &[WorkerIx] {
        &self.assignees[slot]
    }

    pub fn staff_count(&self, slot: usize) -> usize {
        self.assignees[slot].len()
    }

    pub fn is_assigned(&self, slot: usize, worker: WorkerIx) -> bool {
        self.assignees[slot].binary_search(&worker).is_ok()
    }

    /// Adds a worker to a slot, updating the tally. Returns `false` when the
    /// worker was already present.
    pub fn assign(&mut self, slots: &[TimeSlot], slot: usize, worker: WorkerIx) -> bool {
        let set = &mut self.assignees[slot];
        match set.binary_search(&worker) {
            Ok(_) => false,
            Err(pos) => {
                set.insert(pos, worker);
                self.minutes[worker as usize] += slots[slot].duration_minutes;
                true
            }
        }
    }

    /// Removes a worker from a slot, updating the tally. Returns `false`
    /// when the worker was not present.
    pub fn unassign(&mut self, slots: &[TimeSlot], slot: usize, worker: WorkerIx) -> bool {
        let set = &mut self.assignees[slot];
        match set.binary_search(&worker) {
            Ok(pos) => {
                set.remove(pos);
                self.minutes[worker as usize] -= slots[slot].duration_minutes;
                true
            }
            Err(_) => false,
        }
    }

    /// Removes every assignee from a slot.
    pub fn clear_slot(&mut self, slots: &[TimeSlot], slot: usize) {
        let duration = slots[slot].duration_minutes;
        for worker in self.assignees[slot].drain(..) {
            self.minutes[worker as usize] -= duration;
        }
    }

    /// Replaces a slot's assignee set wholesale, updating tallies.
    pub fn set_assignees(&mut self, slots: &[TimeSlot], slot: usize, workers: &[WorkerIx]) {
        self.clear_slot(slots, slot);
        for &w in workers {
            self.assign(slots, slot, w);
        }
    }

    /// Minutes assigned to a worker across the week.
    pub fn minutes_of(&self, worker: WorkerIx) -> u32 {
        self.minutes[worker as usize]
    }

    /// Hours assigned to a worker across the week.
    pub fn hours_of(&self, worker: WorkerIx) -> f64 {
        f64::from(self.minutes[worker as usize]) / 60.0
    }

    /// Total number of (slot, worker) assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignees.iter().map(|a| a.len()).sum()
    }

    /// Rebuilds the minute tally from the assignee sets. Needed after bulk
    /// edits that bypass `assign`/`unassign`, e.g. crossover splicing.
    pub fn rebuild_tally(&mut self, slots: &[TimeSlot]) {
        self.minutes.iter_mut().for_each(|m| *m = 0);
        for (slot, set) in self.assignees.iter().enumerate() {
            for &w in set {
                self.minutes[w as usize] += slots[slot].duration_minutes;
            }
        }
    }

    /// Splices the slot range `[from, to)` from `donor` into `self`,
    /// rebuilding the tally afterwards. Used by two-point crossover.
    pub fn splice_from(&mut self, donor: &ScheduleState, from: usize, to: usize, slots: &[TimeSlot]) {
        self.assignees[from..to].clone_from_slice(&donor.assignees[from..to]);
        self.rebuild_tally(slots);
    }
}
