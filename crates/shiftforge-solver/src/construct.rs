//! Constructive helpers: randomized initial assignments and chromosome
//! repair.

use rand::rngs::StdRng;
use rand::Rng;

use shiftforge_core::{ScheduleState, SchedulingEnvironment, WorkerIx};

use crate::moves::{can_take, eligible_workers};

/// Builds a random assignment filling each slot with `staff_min` workers
/// drawn from its availability pool, respecting the projected-hour target.
///
/// Slots that cannot be filled stay short; the evaluator prices the gap.
pub fn random_fill(env: &SchedulingEnvironment, rng: &mut StdRng) -> ScheduleState {
    let mut state = env.empty_state();
    let cap = env.hour_policy().target_minutes();

    for slot in 0..env.num_slots() {
        let staff_min = env.slot(slot).staff_min;
        let mut pool = eligible_workers(env, &state, slot, cap);
        while state.staff_count(slot) < staff_min && !pool.is_empty() {
            let pick = rng.random_range(0..pool.len());
            let worker = pool.swap_remove(pick);
            state.assign(env.slots(), slot, worker);
        }
    }
    state
}

/// Repairs a candidate after crossover or mutation:
///
/// 1. drops assignees that fail availability,
/// 2. drops the later half of any double-booked overlapping pair,
/// 3. sheds hours from workers above the weekly cap, least-loaded slots
///    first,
/// 4. tops under-min slots up from their pools, under-hours workers first.
pub fn repair(env: &SchedulingEnvironment, state: &mut ScheduleState) {
    let slots = env.slots();
    let cap = env.hour_policy().max_minutes();

    for slot in 0..env.num_slots() {
        for worker in state.assignees(slot).to_vec() {
            if !env.is_worker_available(worker, slot) {
                state.unassign(slots, slot, worker);
            }
        }
    }

    for slot in 0..env.num_slots() {
        for worker in state.assignees(slot).to_vec() {
            let double_booked = env
                .overlapping_slots(slot)
                .iter()
                .any(|&sib| sib < slot && state.is_assigned(sib, worker));
            if double_booked {
                state.unassign(slots, slot, worker);
            }
        }
    }

    for worker in 0..env.num_workers() as WorkerIx {
        if state.minutes_of(worker) <= cap {
            continue;
        }
        let mut held: Vec<usize> = (0..env.num_slots())
            .filter(|&s| state.is_assigned(s, worker))
            .collect();
        // Shed over-staffed slots before minimally staffed ones.
        held.sort_by_key(|&s| {
            (
                state.staff_count(s) <= env.slot(s).staff_min,
                std::cmp::Reverse(s),
            )
        });
        for slot in held {
            if state.minutes_of(worker) <= cap {
                break;
            }
            state.unassign(slots, slot, worker);
        }
    }

    for slot in 0..env.num_slots() {
        if state.staff_count(slot) >= env.slot(slot).staff_min {
            continue;
        }
        let mut pool: Vec<WorkerIx> = eligible_workers(env, state, slot, cap);
        pool.sort_by_key(|&w| (state.minutes_of(w), w));
        for worker in pool {
            if state.staff_count(slot) >= env.slot(slot).staff_min {
                break;
            }
            // Re-check: earlier fills this pass may have booked the worker
            // onto an overlapping slot.
            if can_take(env, state, slot, worker, cap) {
                state.assign(slots, slot, worker);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;

    use shiftforge_core::{
        HourPolicy, PenaltyWeights, Role, ScheduleType, SlotCatalog, StaffingPolicy, Tier, Worker,
    };

    use super::*;

    fn worker(id: &str, tier: Tier) -> Worker {
        Worker {
            id: id.into(),
            name: id.to_uppercase(),
            email: String::new(),
            role: Role::User,
            tier,
            is_commuter: false,
            is_active: true,
            is_floater: false,
            desired_hours: 15,
            busy: Vec::new(),
        }
    }

    fn env() -> SchedulingEnvironment {
        let monday = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let catalog =
            SlotCatalog::for_week(ScheduleType::Finals, monday, &StaffingPolicy::default())
                .unwrap();
        let workers: Vec<Worker> = (0..12)
            .map(|i| {
                let tier = match i % 4 {
                    0 => Tier::One,
                    1 => Tier::Two,
                    2 => Tier::Three,
                    _ => Tier::Four,
                };
                worker(&format!("w{i:02}"), tier)
            })
            .collect();
        SchedulingEnvironment::new(
            workers,
            catalog,
            HourPolicy::default(),
            PenaltyWeights::default(),
        )
        .unwrap()
    }

    #[test]
    fn random_fill_respects_guards() {
        let e = env();
        let mut rng = StdRng::seed_from_u64(3);
        let state = random_fill(&e, &mut rng);

        assert!(state.assignment_count() > 0);
        for s in 0..state.num_slots() {
            assert!(state.staff_count(s) <= e.slot(s).staff_max);
            for &w in state.assignees(s) {
                assert!(e.is_worker_available(w, s));
            }
        }
        for w in 0..e.num_workers() {
            assert!(state.minutes_of(w as u16) <= e.hour_policy().target_minutes());
        }
    }

    #[test]
    fn repair_removes_double_bookings_and_fills_minima() {
        let e = env();
        let mut state = e.empty_state();
        // Double-book worker 0 on the overlapping Window/Remote pair.
        state.assign(e.slots(), 0, 0);
        state.assign(e.slots(), 1, 0);
        repair(&e, &mut state);

        let booked_both = state.is_assigned(0, 0) && state.is_assigned(1, 0);
        assert!(!booked_both);
        // Every slot reaches its minimum given this ample roster.
        for s in 0..state.num_slots() {
            assert!(state.staff_count(s) >= e.slot(s).staff_min);
        }
    }

    #[test]
    fn repair_sheds_hours_above_the_cap() {
        let e = env();
        let mut state = e.empty_state();
        let windows: Vec<usize> = e
            .slots()
            .iter()
            .filter(|s| s.kind == shiftforge_core::ShiftKind::Window)
            .map(|s| s.index)
            .take(22)
            .collect();
        for &s in &windows {
            state.assign(e.slots(), s, 0);
        }
        assert!(state.minutes_of(0) > e.hour_policy().max_minutes());

        repair(&e, &mut state);
        assert!(state.minutes_of(0) <= e.hour_policy().max_minutes());
    }

    #[test]
    fn repair_is_idempotent_on_repaired_state() {
        let e = env();
        let mut rng = StdRng::seed_from_u64(17);
        let mut state = random_fill(&e, &mut rng);
        repair(&e, &mut state);
        let once = state.clone();
        repair(&e, &mut state);
        assert_eq!(state, once);
    }
}
