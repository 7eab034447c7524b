//! Cross-solver properties: determinism, hard-constraint invariants on
//! returned solutions, and zero-penalty feasibility on a minimal instance.

mod common;

use shiftforge_core::{
    ScheduleType, SchedulingEnvironment, ShiftKind, SlotCatalog, Tier, Worker, WorkerIx,
};
use shiftforge_solver::{solve, Algorithm};

use common::{fast_config, monday, slot, tiny_instance_config, worker};

/// Ten-worker finals-week instance with a mix of tiers and commuters.
fn reference_env(config: &shiftforge_config::SchedulerConfig) -> SchedulingEnvironment {
    let catalog =
        SlotCatalog::for_week(ScheduleType::Finals, monday(), &config.staffing).unwrap();
    let workers: Vec<Worker> = (0..10)
        .map(|i| {
            let tier = match i % 4 {
                0 => Tier::One,
                1 => Tier::Two,
                2 => Tier::Three,
                _ => Tier::Four,
            };
            let mut w = worker(&format!("w{i:02}"), tier);
            w.is_commuter = i % 3 == 0;
            w
        })
        .collect();
    SchedulingEnvironment::new(workers, catalog, config.hours, config.weights).unwrap()
}

#[test]
fn same_seed_reproduces_the_same_assignment() {
    let mut config = fast_config();
    // Keep the stochastic budgets small; determinism doesn't need quality.
    config.sa.max_iterations = 5_000;
    config.ga.generations = 30;
    config.csp.max_iterations = 500;
    let env = reference_env(&config);

    for algorithm in Algorithm::ALL {
        let a = solve(algorithm, &env, &config, 1234);
        let b = solve(algorithm, &env, &config, 1234);
        assert_eq!(
            a.assignment, b.assignment,
            "{algorithm} diverged across identical runs"
        );
        assert_eq!(a.penalty, b.penalty);
        assert_eq!(a.iterations, b.iterations);
    }
}

#[test]
fn different_seeds_may_differ_but_stay_valid() {
    let mut config = fast_config();
    config.sa.max_iterations = 5_000;
    let env = reference_env(&config);

    let a = solve(Algorithm::Sa, &env, &config, 1);
    let b = solve(Algorithm::Sa, &env, &config, 2);
    // Not asserting inequality (they may coincide), but both must respect
    // the hard guards below.
    for outcome in [a, b] {
        for w in 0..env.num_workers() {
            assert!(
                outcome.assignment.minutes_of(w as WorkerIx)
                    <= env.hour_policy().max_minutes()
            );
        }
    }
}

#[test]
fn minimal_instance_reaches_zero_penalty_on_every_solver() {
    let config = tiny_instance_config();
    // One day, one Window slot (min 1) and one Remote slot (min 2) in the
    // same hour; three workers whose tiers and desired hours admit a
    // perfect schedule.
    let mut w1 = worker("a", Tier::One);
    let mut w2 = worker("b", Tier::Three);
    let mut w3 = worker("c", Tier::Three);
    for w in [&mut w1, &mut w2, &mut w3] {
        w.desired_hours = 1;
    }
    let env = SchedulingEnvironment::from_parts(
        vec![w1, w2, w3],
        vec![
            slot(0, 600, ShiftKind::Window, 1, 1),
            slot(1, 600, ShiftKind::Remote, 2, 2),
        ],
        config.hours,
        config.weights,
    )
    .unwrap();

    for algorithm in Algorithm::ALL {
        let outcome = solve(algorithm, &env, &config, 99);
        assert_eq!(outcome.penalty, 0.0, "{algorithm} should reach zero");
        assert!(outcome.converged, "{algorithm} should report convergence");
        assert_eq!(outcome.assignment.assignees(0), &[0]);
        assert_eq!(outcome.assignment.assignees(1), &[1, 2]);
    }
}

#[test]
fn no_returned_solution_books_a_commuter_early() {
    let config = fast_config();
    let env = reference_env(&config);

    for algorithm in Algorithm::ALL {
        let outcome = solve(algorithm, &env, &config, 17);
        for s in env.slots() {
            if s.start_minute < env.hour_policy().commuter_cutoff_minute {
                for &w in outcome.assignment.assignees(s.index) {
                    assert!(
                        !env.worker(w).is_commuter,
                        "{algorithm} booked commuter {} at {}",
                        env.worker(w).id,
                        s.start_minute
                    );
                }
            }
        }
    }
}

#[test]
fn no_returned_solution_exceeds_the_weekly_cap() {
    let config = fast_config();
    let env = reference_env(&config);

    for algorithm in Algorithm::ALL {
        let outcome = solve(algorithm, &env, &config, 29);
        for w in 0..env.num_workers() {
            assert!(
                outcome.assignment.minutes_of(w as WorkerIx) <= env.hour_policy().max_minutes(),
                "{algorithm} overbooked worker {w}"
            );
        }
    }
}

#[test]
fn greedy_covers_everything_when_pools_suffice() {
    let config = fast_config();
    let catalog =
        SlotCatalog::for_week(ScheduleType::Finals, monday(), &config.staffing).unwrap();
    // Fourteen unconstrained workers: every slot's pool is far above its
    // staffing minimum and the weekly caps leave ample slack.
    let workers: Vec<Worker> = (0..14)
        .map(|i| worker(&format!("w{i:02}"), if i % 2 == 0 { Tier::One } else { Tier::Three }))
        .collect();
    let env =
        SchedulingEnvironment::new(workers, catalog, config.hours, config.weights).unwrap();
    for s in env.slots() {
        assert!(env.available_workers(s.index).len() >= s.staff_min);
    }

    let outcome = solve(Algorithm::Greedy, &env, &config, 0);
    assert_eq!(outcome.breakdown.coverage_under, 0);
}
