//! Genetic algorithm solver.
//!
//! A chromosome is one complete assignment. Generations apply tournament
//! selection, two-point crossover over the slot sequence, one block-aware
//! mutation operator per mutated child, and repair; the top chromosomes
//! carry over unchanged. The mutation rate adapts upward while the best
//! penalty plateaus and snaps back on improvement.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use shiftforge_config::SchedulerConfig;
use shiftforge_core::{ScheduleState, SchedulingEnvironment};

use crate::construct::{random_fill, repair};
use crate::deadline::Deadline;
use crate::greedy;
use crate::moves::{random_move, MoveKind};
use crate::outcome::{Algorithm, SolveOutcome};

/// Factor applied to the mutation rate when the population stagnates.
const STAGNATION_BOOST: f64 = 1.5;
/// Ceiling for the adaptive mutation rate.
const MAX_MUTATION_RATE: f64 = 0.9;
/// Share of the initial population seeded from the greedy baseline.
const GREEDY_SEED_SHARE: usize = 10;

struct Individual {
    state: ScheduleState,
    penalty: f64,
}

impl Individual {
    fn evaluated(env: &SchedulingEnvironment, state: ScheduleState) -> Self {
        let penalty = env.evaluate(&state).penalty;
        Self { state, penalty }
    }
}

/// Runs the genetic algorithm and returns the best chromosome seen.
pub fn solve(env: &SchedulingEnvironment, config: &SchedulerConfig, seed: u64) -> SolveOutcome {
    let cfg = &config.ga;
    let deadline = Deadline::new(config.time_budget(cfg.max_time_secs));
    let mut rng = StdRng::seed_from_u64(seed);

    // Initial population: a slice of greedy baselines plus random valid
    // assignments filled to staffing minima.
    let mut population: Vec<Individual> = Vec::with_capacity(cfg.population_size);
    if cfg.seed_with_greedy {
        let (greedy_state, _) = greedy::build_schedule(env, &config.greedy);
        let seeds = (cfg.population_size / GREEDY_SEED_SHARE).max(1);
        for _ in 0..seeds.min(cfg.population_size) {
            population.push(Individual::evaluated(env, greedy_state.clone()));
        }
    }
    while population.len() < cfg.population_size {
        population.push(Individual::evaluated(env, random_fill(env, &mut rng)));
    }

    let mut best_state = population[0].state.clone();
    let mut best_penalty = population[0].penalty;
    for ind in &population {
        if ind.penalty < best_penalty {
            best_penalty = ind.penalty;
            best_state = ind.state.clone();
        }
    }

    info!(
        event = "ga_start",
        population = cfg.population_size,
        initial_penalty = best_penalty,
        seed,
    );

    let mut mutation_rate = cfg.mutation_rate;
    let mut plateau: u32 = 0;
    let mut generation: u32 = 0;
    let mut stagnated = false;

    while generation < cfg.generations {
        if best_penalty > 0.0 && deadline.expired() {
            break;
        }
        generation += 1;

        let improved = track_best(&population, &mut best_penalty, &mut best_state);
        if improved {
            plateau = 0;
            mutation_rate = cfg.mutation_rate;
        } else {
            plateau += 1;
            if cfg.stagnation_boost_after > 0 && plateau % cfg.stagnation_boost_after == 0 {
                mutation_rate = (mutation_rate * STAGNATION_BOOST).min(MAX_MUTATION_RATE);
                debug!(event = "ga_mutation_boost", mutation_rate, generation);
            }
            if plateau > cfg.stagnation_limit {
                stagnated = true;
                break;
            }
        }
        if best_penalty == 0.0 {
            break;
        }

        // Elites survive unchanged.
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| {
            population[a]
                .penalty
                .partial_cmp(&population[b].penalty)
                .expect("penalties are finite")
        });
        let mut next: Vec<Individual> = ranked
            .iter()
            .take(cfg.elitism)
            .map(|&i| Individual {
                state: population[i].state.clone(),
                penalty: population[i].penalty,
            })
            .collect();

        while next.len() < cfg.population_size {
            let p1 = tournament(&population, cfg.tournament_size, &mut rng);
            let p2 = tournament(&population, cfg.tournament_size, &mut rng);
            let (mut c1, mut c2) = crossover(
                env,
                &population[p1].state,
                &population[p2].state,
                cfg.crossover_rate,
                &mut rng,
            );

            for child in [&mut c1, &mut c2] {
                if rng.random::<f64>() < mutation_rate {
                    random_move(env, child, &mut rng, &MoveKind::MUTATION);
                }
                repair(env, child);
            }

            next.push(Individual::evaluated(env, c1));
            if next.len() < cfg.population_size {
                next.push(Individual::evaluated(env, c2));
            }
        }
        population = next;
    }

    track_best(&population, &mut best_penalty, &mut best_state);
    let converged = best_penalty == 0.0 || stagnated;
    let evaluation = env.evaluate(&best_state);
    info!(
        event = "ga_end",
        penalty = evaluation.penalty,
        generations = generation,
        converged,
    );
    SolveOutcome::new(
        Algorithm::Ga,
        best_state,
        evaluation,
        deadline.elapsed(),
        u64::from(generation),
        converged,
        seed,
    )
}

/// Updates the best-seen tracking; returns true on improvement.
fn track_best(
    population: &[Individual],
    best_penalty: &mut f64,
    best_state: &mut ScheduleState,
) -> bool {
    let mut improved = false;
    for ind in population {
        if ind.penalty < *best_penalty {
            *best_penalty = ind.penalty;
            *best_state = ind.state.clone();
            improved = true;
        }
    }
    improved
}

/// Tournament selection: the lowest penalty among `k` random entrants.
fn tournament(population: &[Individual], k: usize, rng: &mut StdRng) -> usize {
    let mut winner = rng.random_range(0..population.len());
    for _ in 1..k.max(1) {
        let challenger = rng.random_range(0..population.len());
        if population[challenger].penalty < population[winner].penalty {
            winner = challenger;
        }
    }
    winner
}

/// Two-point crossover over the slot-index sequence. With probability
/// `1 - crossover_rate` the parents are cloned unchanged.
fn crossover(
    env: &SchedulingEnvironment,
    parent1: &ScheduleState,
    parent2: &ScheduleState,
    crossover_rate: f64,
    rng: &mut StdRng,
) -> (ScheduleState, ScheduleState) {
    let mut c1 = parent1.clone();
    let mut c2 = parent2.clone();
    if rng.random::<f64>() > crossover_rate || env.num_slots() < 2 {
        return (c1, c2);
    }

    let a = rng.random_range(0..env.num_slots());
    let b = rng.random_range(a..=env.num_slots());
    c1.splice_from(parent2, a, b, env.slots());
    c2.splice_from(parent1, a, b, env.slots());
    (c1, c2)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shiftforge_core::{
        HourPolicy, PenaltyWeights, Role, ScheduleType, SlotCatalog, StaffingPolicy, Tier, Worker,
    };

    use super::*;

    fn env() -> SchedulingEnvironment {
        let monday = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let catalog =
            SlotCatalog::for_week(ScheduleType::Finals, monday, &StaffingPolicy::default())
                .unwrap();
        let workers: Vec<Worker> = (0..12)
            .map(|i| Worker {
                id: format!("w{i:02}"),
                name: format!("Worker {i}"),
                email: String::new(),
                role: Role::User,
                tier: if i % 2 == 0 { Tier::One } else { Tier::Three },
                is_commuter: false,
                is_active: true,
                is_floater: false,
                desired_hours: 15,
                busy: Vec::new(),
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
    fn crossover_children_mix_parents() {
        let e = env();
        let mut rng = StdRng::seed_from_u64(4);
        let p1 = random_fill(&e, &mut rng);
        let p2 = random_fill(&e, &mut rng);

        let (c1, c2) = crossover(&e, &p1, &p2, 1.0, &mut rng);
        // Every slot of each child comes from one of the parents.
        for s in 0..e.num_slots() {
            assert!(c1.assignees(s) == p1.assignees(s) || c1.assignees(s) == p2.assignees(s));
            assert!(c2.assignees(s) == p1.assignees(s) || c2.assignees(s) == p2.assignees(s));
        }
    }

    #[test]
    fn zero_crossover_rate_clones_parents() {
        let e = env();
        let mut rng = StdRng::seed_from_u64(4);
        let p1 = random_fill(&e, &mut rng);
        let p2 = random_fill(&e, &mut rng);
        let (c1, c2) = crossover(&e, &p1, &p2, 0.0, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn tournament_prefers_lower_penalty() {
        let e = env();
        let mut rng = StdRng::seed_from_u64(9);
        let strong = Individual {
            state: e.empty_state(),
            penalty: 1.0,
        };
        let weak = Individual {
            state: e.empty_state(),
            penalty: 1000.0,
        };
        let population = vec![weak, strong];
        // A full-size tournament sees both entrants eventually.
        let mut wins = 0;
        for _ in 0..50 {
            if tournament(&population, 2, &mut rng) == 1 {
                wins += 1;
            }
        }
        assert!(wins > 25);
    }
}
