//! Neighborhood moves shared by the SA, CSP and GA solvers.
//!
//! Every move mutates the candidate state in place and returns a [`MoveLog`]
//! that can undo (or redo) it exactly. Moves only produce states that respect
//! availability, the weekly hour cap and the no-double-booking rule; the
//! evaluator still re-checks everything, so a buggy move costs quality, not
//! correctness.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;

use shiftforge_core::{ScheduleState, SchedulingEnvironment, WorkerIx};

/// The move operators drawn uniformly during neighborhood search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Exchange two workers between two slots of the same kind.
    Swap,
    /// Add one eligible worker to an under-max slot.
    Extend,
    /// Remove one assignee from an over-min slot.
    Shrink,
    /// Replace one assignee with a different eligible worker.
    Reassign,
    /// Populate an empty slot with `staff_min` workers.
    FillEmpty,
}

impl MoveKind {
    /// The full neighborhood used by SA and the CSP improver.
    pub const NEIGHBORHOOD: [MoveKind; 5] = [
        MoveKind::Swap,
        MoveKind::Extend,
        MoveKind::Shrink,
        MoveKind::Reassign,
        MoveKind::FillEmpty,
    ];

    /// The mutation operators used by the GA (no shrink, fill targets
    /// under-min slots instead of empty ones).
    pub const MUTATION: [MoveKind; 4] = [
        MoveKind::Extend,
        MoveKind::Swap,
        MoveKind::FillEmpty,
        MoveKind::Reassign,
    ];
}

/// Primitive edit recorded by a move.
#[derive(Debug, Clone, Copy)]
enum MoveOp {
    Added { slot: usize, worker: WorkerIx },
    Removed { slot: usize, worker: WorkerIx },
}

/// Exact record of a move's edits, for undo and redo.
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    ops: SmallVec<[MoveOp; 4]>,
}

impl MoveLog {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn added(&mut self, state: &mut ScheduleState, env: &SchedulingEnvironment, slot: usize, worker: WorkerIx) {
        state.assign(env.slots(), slot, worker);
        self.ops.push(MoveOp::Added { slot, worker });
    }

    fn removed(&mut self, state: &mut ScheduleState, env: &SchedulingEnvironment, slot: usize, worker: WorkerIx) {
        state.unassign(env.slots(), slot, worker);
        self.ops.push(MoveOp::Removed { slot, worker });
    }

    /// Reverts the move, restoring the state that existed before `apply`.
    pub fn undo(&self, env: &SchedulingEnvironment, state: &mut ScheduleState) {
        for op in self.ops.iter().rev() {
            match *op {
                MoveOp::Added { slot, worker } => {
                    state.unassign(env.slots(), slot, worker);
                }
                MoveOp::Removed { slot, worker } => {
                    state.assign(env.slots(), slot, worker);
                }
            }
        }
    }

    /// Re-applies the move after an `undo`.
    pub fn redo(&self, env: &SchedulingEnvironment, state: &mut ScheduleState) {
        for op in &self.ops {
            match *op {
                MoveOp::Added { slot, worker } => {
                    state.assign(env.slots(), slot, worker);
                }
                MoveOp::Removed { slot, worker } => {
                    state.unassign(env.slots(), slot, worker);
                }
            }
        }
    }
}

/// True when `worker` can be added to `slot` without breaking availability,
/// duplicating an assignment, double-booking an overlapping slot, or pushing
/// the worker past `cap_minutes`.
pub fn can_take(
    env: &SchedulingEnvironment,
    state: &ScheduleState,
    slot: usize,
    worker: WorkerIx,
    cap_minutes: u32,
) -> bool {
    if !env.is_worker_available(worker, slot) || state.is_assigned(slot, worker) {
        return false;
    }
    if state.minutes_of(worker) + env.slot(slot).duration_minutes > cap_minutes {
        return false;
    }
    !env.overlapping_slots(slot)
        .iter()
        .any(|&sib| state.is_assigned(sib, worker))
}

/// Workers eligible to join `slot` under `cap_minutes`, in roster order.
pub fn eligible_workers(
    env: &SchedulingEnvironment,
    state: &ScheduleState,
    slot: usize,
    cap_minutes: u32,
) -> Vec<WorkerIx> {
    env.available_workers(slot)
        .iter()
        .copied()
        .filter(|&w| can_take(env, state, slot, w, cap_minutes))
        .collect()
}

/// All `(slot, worker)` assignment pairs, in slot order.
fn assigned_pairs(state: &ScheduleState) -> Vec<(usize, WorkerIx)> {
    (0..state.num_slots())
        .flat_map(|s| state.assignees(s).iter().map(move |&w| (s, w)))
        .collect()
}

/// Applies one randomly drawn move from `kinds`. Returns `None` when the
/// drawn operator has no applicable site in the current state.
pub fn random_move(
    env: &SchedulingEnvironment,
    state: &mut ScheduleState,
    rng: &mut StdRng,
    kinds: &[MoveKind],
) -> Option<MoveLog> {
    let kind = *kinds.choose(rng)?;
    let cap = env.hour_policy().max_minutes();
    let mut log = MoveLog::default();

    match kind {
        MoveKind::Swap => {
            let pairs = assigned_pairs(state);
            if pairs.len() < 2 {
                return None;
            }
            let (s1, w1) = pairs[rng.random_range(0..pairs.len())];
            let (s2, w2) = pairs[rng.random_range(0..pairs.len())];
            if s1 == s2 || w1 == w2 || env.slot(s1).kind != env.slot(s2).kind {
                return None;
            }
            // Each worker must fit the other's slot once their own is freed.
            log.removed(state, env, s1, w1);
            log.removed(state, env, s2, w2);
            if can_take(env, state, s2, w1, cap) && can_take(env, state, s1, w2, cap) {
                log.added(state, env, s2, w1);
                log.added(state, env, s1, w2);
            } else {
                log.undo(env, state);
                return None;
            }
        }
        MoveKind::Extend => {
            let open: Vec<usize> = (0..state.num_slots())
                .filter(|&s| state.staff_count(s) < env.slot(s).staff_max)
                .collect();
            let &slot = open.choose(rng)?;
            let pool = eligible_workers(env, state, slot, cap);
            let &worker = pool.choose(rng)?;
            log.added(state, env, slot, worker);
        }
        MoveKind::Shrink => {
            let over: Vec<usize> = (0..state.num_slots())
                .filter(|&s| state.staff_count(s) > env.slot(s).staff_min)
                .collect();
            let &slot = over.choose(rng)?;
            let assignees = state.assignees(slot).to_vec();
            let &worker = assignees.choose(rng)?;
            log.removed(state, env, slot, worker);
        }
        MoveKind::Reassign => {
            let pairs = assigned_pairs(state);
            let &(slot, old) = pairs.choose(rng)?;
            log.removed(state, env, slot, old);
            let pool: Vec<WorkerIx> = eligible_workers(env, state, slot, cap)
                .into_iter()
                .filter(|&w| w != old)
                .collect();
            match pool.choose(rng) {
                Some(&new) => log.added(state, env, slot, new),
                None => {
                    log.undo(env, state);
                    return None;
                }
            }
        }
        MoveKind::FillEmpty => {
            // GA's "fill gaps" and SA's "fill empty" share this operator:
            // any slot below its minimum is topped up to staff_min.
            let under: Vec<usize> = (0..state.num_slots())
                .filter(|&s| state.staff_count(s) < env.slot(s).staff_min)
                .collect();
            let &slot = under.choose(rng)?;
            let mut pool = eligible_workers(env, state, slot, cap);
            while state.staff_count(slot) < env.slot(slot).staff_min && !pool.is_empty() {
                let pick = rng.random_range(0..pool.len());
                let worker = pool.swap_remove(pick);
                log.added(state, env, slot, worker);
            }
            if log.is_empty() {
                return None;
            }
        }
    }

    Some(log)
}
