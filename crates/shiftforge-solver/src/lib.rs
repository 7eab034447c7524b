//! shiftforge Solver Engine
//!
//! This crate provides the solvers that consult the shared scheduling
//! environment:
//! - Deterministic greedy baseline (block layout + balance step)
//! - Genetic algorithm
//! - Simulated annealing
//! - Two-phase CSP solver (constructive pass + best-improvement search)
//! - The neighborhood move system and repair they share

pub mod construct;
pub mod csp;
pub mod deadline;
pub mod ga;
pub mod greedy;
pub mod moves;
pub mod outcome;
pub mod sa;

pub use construct::{random_fill, repair};
pub use deadline::Deadline;
pub use greedy::{balance_hours, carve_blocks, GreedyBlock};
pub use moves::{can_take, eligible_workers, random_move, MoveKind, MoveLog};
pub use outcome::{Algorithm, SolveOutcome};

use shiftforge_config::SchedulerConfig;
use shiftforge_core::SchedulingEnvironment;

/// Runs the chosen solver against the environment with an explicit seed.
pub fn solve(
    algorithm: Algorithm,
    env: &SchedulingEnvironment,
    config: &SchedulerConfig,
    seed: u64,
) -> SolveOutcome {
    match algorithm {
        Algorithm::Greedy => greedy::solve(env, &config.greedy, seed),
        Algorithm::Ga => ga::solve(env, config, seed),
        Algorithm::Sa => sa::solve(env, config, seed),
        Algorithm::Csp => csp::solve(env, config, seed),
    }
}
