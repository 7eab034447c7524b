//! Simulated annealing solver.
//!
//! Single-state search over the shared neighborhood, seeded with the greedy
//! baseline. Improving or equal moves are always accepted; a worsening move
//! of `delta` is accepted with probability `exp(-delta / T)`. Temperature
//! decays geometrically per temperature step, and a long unimproved streak
//! reheats to half the starting temperature to escape local optima.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use shiftforge_config::SchedulerConfig;
use shiftforge_core::SchedulingEnvironment;

use crate::deadline::Deadline;
use crate::greedy;
use crate::moves::{random_move, MoveKind};
use crate::outcome::{Algorithm, SolveOutcome};

/// Acceptance probability for a move of `delta` at temperature `temp`.
fn acceptance(delta: f64, temp: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else if temp <= 0.0 {
        0.0
    } else {
        (-delta / temp).exp()
    }
}

/// Runs simulated annealing and returns the best schedule seen.
pub fn solve(env: &SchedulingEnvironment, config: &SchedulerConfig, seed: u64) -> SolveOutcome {
    let cfg = &config.sa;
    let deadline = Deadline::new(config.time_budget(cfg.max_time_secs));
    let mut rng = StdRng::seed_from_u64(seed);

    let (mut state, _) = greedy::build_schedule(env, &config.greedy);
    let mut current = env.evaluate(&state);
    let mut best_state = state.clone();
    let mut best = current;

    info!(
        event = "sa_start",
        initial_penalty = current.penalty,
        initial_temp = cfg.initial_temp,
        seed,
    );

    let mut temp = cfg.initial_temp;
    let mut iterations: u64 = 0;
    let mut unimproved: u32 = 0;
    let mut hit_budget = false;

    'cooling: while temp > cfg.final_temp {
        // Budgets are checked at the outer loop boundary only; the inner
        // batch at one temperature runs to completion.
        if deadline.expired() || iterations >= cfg.max_iterations {
            hit_budget = true;
            break;
        }

        for _ in 0..cfg.iterations_per_temp {
            iterations += 1;
            let Some(log) = random_move(env, &mut state, &mut rng, &MoveKind::NEIGHBORHOOD)
            else {
                unimproved += 1;
                continue;
            };

            let candidate = env.evaluate(&state);
            let delta = candidate.penalty - current.penalty;
            if rng.random::<f64>() < acceptance(delta, temp) {
                current = candidate;
                if current.penalty < best.penalty {
                    best = current;
                    best_state = state.clone();
                    unimproved = 0;
                } else {
                    unimproved += 1;
                }
            } else {
                log.undo(env, &mut state);
                unimproved += 1;
            }

            if best.penalty == 0.0 {
                break 'cooling;
            }
            if unimproved >= cfg.reheat_after {
                temp = cfg.initial_temp / 2.0;
                unimproved = 0;
                debug!(event = "sa_reheat", temp, iterations);
            }
        }

        temp *= cfg.cooling_rate;
    }

    let converged = best.penalty == 0.0 || !hit_budget;
    info!(
        event = "sa_end",
        penalty = best.penalty,
        iterations,
        converged,
        final_temp = temp,
    );
    SolveOutcome::new(
        Algorithm::Sa,
        best_state,
        best,
        deadline.elapsed(),
        iterations,
        converged,
        seed,
    )
}
