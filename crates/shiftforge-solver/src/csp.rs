//! Two-phase CSP-style solver: constructive assignment of the most
//! constrained slots first, then best-improvement local search.
//!
//! Phase 1 orders slots by availability-pool size (fewest options first,
//! earlier date/hour on ties) and fills each to its staffing minimum,
//! picking the workers whose hours sit furthest below their desired weekly
//! hours, ties broken lexicographically by worker id. Phase 2 samples a
//! batch of neighborhood moves per step and applies only the strictly best
//! improving one; a streak of dry steps counts as move exhaustion.

use std::cmp::Reverse;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use shiftforge_config::SchedulerConfig;
use shiftforge_core::{ScheduleState, SchedulingEnvironment, WorkerIx};

use crate::deadline::Deadline;
use crate::moves::{eligible_workers, random_move, MoveKind, MoveLog};
use crate::outcome::{Algorithm, SolveOutcome};

/// Runs both phases and returns the improved schedule.
pub fn solve(env: &SchedulingEnvironment, config: &SchedulerConfig, seed: u64) -> SolveOutcome {
    let cfg = &config.csp;
    let deadline = Deadline::new(config.time_budget(cfg.max_time_secs));
    let mut rng = StdRng::seed_from_u64(seed);

    let mut state = construct(env);
    let constructed = env.evaluate(&state);
    info!(
        event = "csp_constructed",
        penalty = constructed.penalty,
        coverage_under = constructed.breakdown.coverage_under,
        seed,
    );

    let mut current = constructed;
    let mut iterations: u64 = 0;
    let mut dry_steps: u32 = 0;
    let mut exhausted = false;

    while iterations < cfg.max_iterations && !deadline.expired() {
        iterations += 1;
        if current.penalty == 0.0 {
            break;
        }

        // Best-improvement step: probe a batch of candidate moves from the
        // current state and keep only the strictly best one.
        let mut best_delta = 0.0_f64;
        let mut best_move: Option<MoveLog> = None;
        for _ in 0..cfg.moves_per_step {
            let Some(log) = random_move(env, &mut state, &mut rng, &MoveKind::NEIGHBORHOOD)
            else {
                continue;
            };
            let candidate = env.evaluate(&state);
            let delta = candidate.penalty - current.penalty;
            log.undo(env, &mut state);
            if delta < best_delta {
                best_delta = delta;
                best_move = Some(log);
            }
        }

        match best_move {
            Some(log) => {
                log.redo(env, &mut state);
                current = env.evaluate(&state);
                dry_steps = 0;
            }
            None => {
                dry_steps += 1;
                if dry_steps >= cfg.exhaustion_limit {
                    exhausted = true;
                    debug!(event = "csp_exhausted", iterations);
                    break;
                }
            }
        }
    }

    let converged = current.penalty == 0.0 || exhausted;
    info!(
        event = "csp_end",
        penalty = current.penalty,
        iterations,
        converged,
    );
    SolveOutcome::new(
        Algorithm::Csp,
        state,
        current,
        deadline.elapsed(),
        iterations,
        converged,
        seed,
    )
}

/// Phase 1: greedy construction, most constrained slots first.
pub fn construct(env: &SchedulingEnvironment) -> ScheduleState {
    let mut order: Vec<usize> = (0..env.num_slots()).collect();
    order.sort_by_key(|&s| {
        let slot = env.slot(s);
        (
            env.available_workers(s).len(),
            slot.date,
            slot.start_minute,
            s,
        )
    });

    let cap = env.hour_policy().max_minutes();
    let mut state = env.empty_state();
    for &slot in &order {
        while state.staff_count(slot) < env.slot(slot).staff_min {
            let Some(pick) = most_deprived(env, &state, slot, cap) else {
                break;
            };
            state.assign(env.slots(), slot, pick);
        }
    }
    state
}

/// The eligible worker whose assigned hours sit furthest below their
/// desired weekly hours; ties break lexicographically by id.
fn most_deprived(
    env: &SchedulingEnvironment,
    state: &ScheduleState,
    slot: usize,
    cap_minutes: u32,
) -> Option<WorkerIx> {
    eligible_workers(env, state, slot, cap_minutes)
        .into_iter()
        .min_by_key(|&w| {
            let desired = i64::from(env.worker(w).desired_hours) * 60;
            let below = desired - i64::from(state.minutes_of(w));
            (Reverse(below), env.worker(w).id.clone())
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shiftforge_core::{
        HourPolicy, PenaltyWeights, Role, ScheduleType, ShiftKind, SlotCatalog, StaffingPolicy,
        Tier, Worker,
    };

    use super::*;

    fn worker(id: &str, desired: u32) -> Worker {
        Worker {
            id: id.into(),
            name: id.to_uppercase(),
            email: String::new(),
            role: Role::User,
            tier: Tier::Two,
            is_commuter: false,
            is_active: true,
            is_floater: false,
            desired_hours: desired,
            busy: Vec::new(),
        }
    }

    #[test]
    fn construction_fills_minima_with_ample_roster() {
        let monday = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let catalog =
            SlotCatalog::for_week(ScheduleType::Finals, monday, &StaffingPolicy::default())
                .unwrap();
        let workers: Vec<Worker> = (0..14).map(|i| worker(&format!("w{i:02}"), 15)).collect();
        let env = SchedulingEnvironment::new(
            workers,
            catalog,
            HourPolicy::default(),
            PenaltyWeights::default(),
        )
        .unwrap();

        let state = construct(&env);
        for slot in env.slots() {
            assert!(
                state.staff_count(slot.index) >= slot.staff_min,
                "slot {} under min",
                slot.index
            );
        }
    }

    #[test]
    fn construction_prefers_most_deprived_worker() {
        let monday = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let catalog =
            SlotCatalog::for_week(ScheduleType::Regular, monday, &StaffingPolicy::default())
                .unwrap();
        // `hungry` wants many more hours than `full`; with a fresh state the
        // first pick for any slot must be `hungry`.
        let env = SchedulingEnvironment::new(
            vec![worker("full", 10), worker("hungry", 20)],
            catalog,
            HourPolicy::default(),
            PenaltyWeights::default(),
        )
        .unwrap();

        let state = env.empty_state();
        let first = env
            .slots()
            .iter()
            .find(|s| s.kind == ShiftKind::Window)
            .unwrap();
        let pick = most_deprived(&env, &state, first.index, u32::MAX).unwrap();
        assert_eq!(env.worker(pick).id, "hungry");
    }

    #[test]
    fn tie_breaks_lexicographically_by_id() {
        let monday = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let catalog =
            SlotCatalog::for_week(ScheduleType::Finals, monday, &StaffingPolicy::default())
                .unwrap();
        let env = SchedulingEnvironment::new(
            vec![worker("beta", 15), worker("alpha", 15)],
            catalog,
            HourPolicy::default(),
            PenaltyWeights::default(),
        )
        .unwrap();

        let state = env.empty_state();
        let pick = most_deprived(&env, &state, 0, u32::MAX).unwrap();
        assert_eq!(env.worker(pick).id, "alpha");
    }
}
