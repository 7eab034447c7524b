//! Deterministic greedy baseline.
//!
//! For every operating day the baseline lays down 2-4 hour hour-aligned
//! blocks, staffs each block's Window then Remote sub-shift from a
//! tier-agnostic eligibility pool capped at the weekly target, and finally
//! tops up underworked workers on remaining Remote slack. The result is both
//! a deliverable schedule and the seed for the stochastic solvers.
//!
//! The whole procedure is deterministic: pools are ordered by
//! (under-target, fewer hours, least-recently-picked, id) and no randomness
//! is consulted.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use shiftforge_config::GreedyConfig;
use shiftforge_core::{ScheduleState, SchedulingEnvironment, ShiftKind, WorkerIx};

use crate::outcome::{Algorithm, SolveOutcome};

/// One multi-hour coverage block with its Window and Remote staff.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyBlock {
    pub date: NaiveDate,
    /// Start in minutes from midnight.
    pub start: u32,
    pub end: u32,
    /// Hourly Window slot indices spanning the block.
    pub window_slots: Vec<usize>,
    /// Hourly Remote slot indices spanning the block.
    pub remote_slots: Vec<usize>,
    pub window: Vec<WorkerIx>,
    pub remote: Vec<WorkerIx>,
}

impl GreedyBlock {
    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    fn slots_for(&self, kind: ShiftKind) -> &[usize] {
        match kind {
            ShiftKind::Window => &self.window_slots,
            ShiftKind::Remote => &self.remote_slots,
        }
    }

    fn staff_for(&self, kind: ShiftKind) -> &[WorkerIx] {
        match kind {
            ShiftKind::Window => &self.window,
            ShiftKind::Remote => &self.remote,
        }
    }

    fn staff_mut(&mut self, kind: ShiftKind) -> &mut Vec<WorkerIx> {
        match kind {
            ShiftKind::Window => &mut self.window,
            ShiftKind::Remote => &mut self.remote,
        }
    }
}

/// Runs the baseline and packages the result.
pub fn solve(env: &SchedulingEnvironment, cfg: &GreedyConfig, seed: u64) -> SolveOutcome {
    let started = Instant::now();
    let (state, blocks) = build_schedule(env, cfg);
    let evaluation = env.evaluate(&state);
    info!(
        event = "greedy_done",
        blocks = blocks.len(),
        penalty = evaluation.penalty,
        coverage_under = evaluation.breakdown.coverage_under,
    );
    SolveOutcome::new(
        Algorithm::Greedy,
        state,
        evaluation,
        started.elapsed(),
        blocks.len() as u64,
        true,
        seed,
    )
}

/// Runs the baseline, returning the assignment together with the block
/// structure (exposed for the balance step and for tests).
pub fn build_schedule(
    env: &SchedulingEnvironment,
    cfg: &GreedyConfig,
) -> (ScheduleState, Vec<GreedyBlock>) {
    let mut blocks = carve_blocks(env, cfg);
    let mut state = env.empty_state();
    let mut picker = Picker::new(env);

    for block in &mut blocks {
        picker.staff_block(&mut state, block, ShiftKind::Window);
        picker.staff_block(&mut state, block, ShiftKind::Remote);
    }

    balance_hours(env, &mut blocks, &mut state);
    (state, blocks)
}

/// Carves each operating day into non-overlapping hour-aligned blocks.
///
/// Candidates run `min_block_hours..=max_block_hours`; the scan keeps the
/// longest block at each position that does not strand a tail shorter than
/// the minimum, and a sub-minimum final tail is merged into the preceding
/// block so every operating hour is covered.
pub fn carve_blocks(env: &SchedulingEnvironment, cfg: &GreedyConfig) -> Vec<GreedyBlock> {
    // (date, kind, start hour) -> slot index, plus per-day hour spans.
    let mut slot_at: BTreeMap<(NaiveDate, ShiftKind, u32), usize> = BTreeMap::new();
    let mut day_span: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for slot in env.slots() {
        slot_at.insert((slot.date, slot.kind, slot.start_hour()), slot.index);
        let span = day_span
            .entry(slot.date)
            .or_insert((slot.start_hour(), slot.start_hour() + 1));
        span.0 = span.0.min(slot.start_hour());
        span.1 = span.1.max(slot.start_hour() + 1);
    }

    let min_len = cfg.min_block_hours.max(1);
    let max_len = cfg.max_block_hours.max(min_len);

    let mut blocks = Vec::new();
    for (&date, &(open, close)) in &day_span {
        let mut cursor = open;
        let mut day_blocks: Vec<(u32, u32)> = Vec::new();
        while cursor < close {
            let remaining = close - cursor;
            if remaining < min_len {
                // Sub-minimum tail: extend the previous block over it, or
                // keep a short day as one short block.
                match day_blocks.last_mut() {
                    Some(last) => last.1 = close,
                    None => day_blocks.push((cursor, close)),
                }
                break;
            }
            let mut length = max_len.min(remaining);
            while length > min_len && remaining - length != 0 && remaining - length < min_len {
                length -= 1;
            }
            day_blocks.push((cursor, cursor + length));
            cursor += length;
        }

        for (from, to) in day_blocks {
            let gather = |kind: ShiftKind| -> Vec<usize> {
                (from..to)
                    .filter_map(|hour| slot_at.get(&(date, kind, hour)).copied())
                    .collect()
            };
            blocks.push(GreedyBlock {
                date,
                start: from * 60,
                end: to * 60,
                window_slots: gather(ShiftKind::Window),
                remote_slots: gather(ShiftKind::Remote),
                window: Vec::new(),
                remote: Vec::new(),
            });
        }
    }
    blocks
}

/// Worker selection with the tier-agnostic cap-and-retry pool and the
/// round-robin recency tie-breaker.
struct Picker<'a> {
    env: &'a SchedulingEnvironment,
    /// Monotone pick counter per worker, for least-recently-picked ordering.
    last_pick: Vec<u64>,
    clock: u64,
}

impl<'a> Picker<'a> {
    fn new(env: &'a SchedulingEnvironment) -> Self {
        Self {
            env,
            last_pick: vec![0; env.num_workers()],
            clock: 0,
        }
    }

    /// Staffs one kind of a block to its staffing minimum: pool under the
    /// TARGET cap, retried at MAX when too small, ordered by (under-target,
    /// fewer hours, least recently picked, id). The balance step later
    /// raises Remote blocks toward their maximum; spending extra hours here
    /// would starve later blocks of their minima.
    fn staff_block(&mut self, state: &mut ScheduleState, block: &mut GreedyBlock, kind: ShiftKind) {
        let slots = block.slots_for(kind).to_vec();
        let Some(&first_slot) = slots.first() else {
            return;
        };
        let staff_min = self.env.slot(first_slot).staff_min;

        let target_cap = self.env.hour_policy().target_minutes();
        let mut pool = self.pool(state, block, &slots, target_cap);
        if pool.len() < staff_min {
            let max_cap = self.env.hour_policy().max_minutes();
            pool = self.pool(state, block, &slots, max_cap);
        }
        self.order(state, &mut pool);

        for worker in pool.into_iter().take(staff_min) {
            for &slot in &slots {
                state.assign(self.env.slots(), slot, worker);
            }
            block.staff_mut(kind).push(worker);
            self.clock += 1;
            self.last_pick[worker as usize] = self.clock;
        }

        let staffed = block.staff_for(kind).len();
        if staffed < staff_min {
            debug!(
                date = %block.date,
                start = block.start,
                kind = %kind,
                staffed,
                staff_min,
                "greedy block below staffing minimum"
            );
        }
    }

    /// Eligible workers for a whole block: available every hour, not yet in
    /// the block's other kind, projected hours within `cap_minutes`.
    fn pool(
        &self,
        state: &ScheduleState,
        block: &GreedyBlock,
        slots: &[usize],
        cap_minutes: u32,
    ) -> Vec<WorkerIx> {
        let duration = block.duration_minutes();
        (0..self.env.num_workers() as WorkerIx)
            .filter(|&w| {
                !block.window.contains(&w)
                    && !block.remote.contains(&w)
                    && state.minutes_of(w) + duration <= cap_minutes
                    && slots.iter().all(|&s| self.env.is_worker_available(w, s))
            })
            .collect()
    }

    fn order(&self, state: &ScheduleState, pool: &mut [WorkerIx]) {
        let target = self.env.hour_policy().target_minutes();
        pool.sort_by_key(|&w| {
            (
                state.minutes_of(w) >= target,
                state.minutes_of(w),
                self.last_pick[w as usize],
                w,
            )
        });
    }
}

/// Tops up under-target workers on Remote blocks with spare capacity.
///
/// Deterministic and idempotent: a second run finds every worker either at
/// target or without a qualifying block, and changes nothing. Returns the
/// number of additions made.
pub fn balance_hours(
    env: &SchedulingEnvironment,
    blocks: &mut [GreedyBlock],
    state: &mut ScheduleState,
) -> usize {
    let target = env.hour_policy().target_minutes();
    let max = env.hour_policy().max_minutes();

    let mut under: Vec<WorkerIx> = (0..env.num_workers() as WorkerIx)
        .filter(|&w| env.worker(w).is_active && state.minutes_of(w) < target)
        .collect();
    under.sort_by_key(|&w| (state.minutes_of(w), w));

    let mut added = 0;
    for worker in under {
        for block in blocks.iter_mut() {
            if state.minutes_of(worker) >= target {
                break;
            }
            let (remote_max, fits) = {
                let Some(&first) = block.remote_slots.first() else {
                    continue;
                };
                let fits = block
                    .remote_slots
                    .iter()
                    .all(|&s| env.is_worker_available(worker, s));
                (env.slot(first).staff_max, fits)
            };
            if block.remote.len() >= remote_max
                || block.window.contains(&worker)
                || block.remote.contains(&worker)
                || !fits
                || state.minutes_of(worker) + block.duration_minutes() > max
            {
                continue;
            }
            for &slot in &block.remote_slots {
                state.assign(env.slots(), slot, worker);
            }
            block.remote.push(worker);
            added += 1;
        }
    }
    added
}
