//! Configuration system for shiftforge.
//!
//! Load scheduler configuration from TOML files to control staffing bounds,
//! hour policy, penalty weights and solver knobs without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use shiftforge_config::SchedulerConfig;
//!
//! let config = SchedulerConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [staffing]
//!     remote_max = 3
//!
//!     [sa]
//!     initial_temp = 2000.0
//!     cooling_rate = 0.997
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.staffing.remote_max, 3);
//! assert_eq!(config.sa.cooling_rate, 0.997);
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use shiftforge_config::SchedulerConfig;
//!
//! let config = SchedulerConfig::load("shiftforge.toml").unwrap_or_default();
//! // Proceeds with defaults if the file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shiftforge_core::{HourPolicy, PenaltyWeights, StaffingPolicy};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main scheduler configuration: operating policies plus one knob block per
/// solver. Every field carries a working default and can be overridden from
/// TOML.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Random seed for reproducible runs. `None` derives one from the clock.
    pub random_seed: Option<u64>,

    /// Global wall-clock cap in seconds, overriding per-solver caps.
    pub max_time_secs: Option<u64>,

    /// Per-kind staffing bounds.
    pub staffing: StaffingPolicy,

    /// Weekly hour caps and the commuter cutoff.
    pub hours: HourPolicy,

    /// Penalty weight table for the evaluator.
    pub weights: PenaltyWeights,

    /// Genetic algorithm knobs.
    pub ga: GaConfig,

    /// Simulated annealing knobs.
    pub sa: SaConfig,

    /// Two-phase CSP solver knobs.
    pub csp: CspConfig,

    /// Greedy baseline knobs.
    pub greedy: GreedyConfig,
}

impl SchedulerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the global time limit.
    pub fn with_max_time_secs(mut self, seconds: u64) -> Self {
        self.max_time_secs = Some(seconds);
        self
    }

    /// The wall-clock budget for a solver whose own cap is `solver_secs`,
    /// honoring the global override when present.
    pub fn time_budget(&self, solver_secs: u64) -> Duration {
        Duration::from_secs(self.max_time_secs.unwrap_or(solver_secs))
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.staffing;
        if s.window_min > s.window_max {
            return Err(ConfigError::Invalid(
                "staffing.window_min exceeds window_max".into(),
            ));
        }
        if s.remote_min > s.remote_max {
            return Err(ConfigError::Invalid(
                "staffing.remote_min exceeds remote_max".into(),
            ));
        }
        if self.hours.min_hours > self.hours.max_hours {
            return Err(ConfigError::Invalid(
                "hours.min_hours exceeds max_hours".into(),
            ));
        }
        if self.ga.population_size == 0 {
            return Err(ConfigError::Invalid("ga.population_size is zero".into()));
        }
        if self.ga.elitism >= self.ga.population_size {
            return Err(ConfigError::Invalid(
                "ga.elitism must be below population_size".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ga.mutation_rate)
            || !(0.0..=1.0).contains(&self.ga.crossover_rate)
        {
            return Err(ConfigError::Invalid(
                "ga rates must lie in [0, 1]".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.sa.cooling_rate) {
            return Err(ConfigError::Invalid(
                "sa.cooling_rate must lie in [0, 1)".into(),
            ));
        }
        if self.sa.final_temp <= 0.0 || self.sa.initial_temp <= self.sa.final_temp {
            return Err(ConfigError::Invalid(
                "sa temperatures must satisfy 0 < final < initial".into(),
            ));
        }
        if self.greedy.min_block_hours < 1 || self.greedy.min_block_hours > self.greedy.max_block_hours
        {
            return Err(ConfigError::Invalid(
                "greedy block bounds must satisfy 1 <= min <= max".into(),
            ));
        }
        Ok(())
    }
}

/// Genetic algorithm knobs.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: u32,
    pub crossover_rate: f64,
    /// Base per-child mutation probability; the adaptive schedule raises it.
    pub mutation_rate: f64,
    /// Chromosomes carried over unchanged each generation.
    pub elitism: usize,
    pub tournament_size: usize,
    /// Plateau length (generations) before the mutation rate is boosted.
    pub stagnation_boost_after: u32,
    /// Plateau length (generations) that terminates the run.
    pub stagnation_limit: u32,
    /// Seed part of the initial population with the greedy baseline.
    pub seed_with_greedy: bool,
    pub max_time_secs: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 300,
            crossover_rate: 0.85,
            mutation_rate: 0.15,
            elitism: 5,
            tournament_size: 3,
            stagnation_boost_after: 20,
            stagnation_limit: 100,
            seed_with_greedy: true,
            max_time_secs: 40,
        }
    }
}

/// Simulated annealing knobs.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SaConfig {
    pub initial_temp: f64,
    pub final_temp: f64,
    /// Geometric decay per temperature step.
    pub cooling_rate: f64,
    pub iterations_per_temp: u32,
    /// Unimproved iterations before reheating to `initial_temp / 2`.
    pub reheat_after: u32,
    pub max_iterations: u64,
    pub max_time_secs: u64,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1000.0,
            final_temp: 0.1,
            cooling_rate: 0.995,
            iterations_per_temp: 50,
            reheat_after: 1000,
            max_iterations: 100_000,
            max_time_secs: 30,
        }
    }
}

/// Two-phase CSP solver knobs.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CspConfig {
    pub max_iterations: u64,
    /// Candidate moves sampled per best-improvement step.
    pub moves_per_step: usize,
    /// Consecutive non-improving steps treated as move exhaustion.
    pub exhaustion_limit: u32,
    pub max_time_secs: u64,
}

impl Default for CspConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            moves_per_step: 32,
            exhaustion_limit: 50,
            max_time_secs: 60,
        }
    }
}

/// Greedy baseline knobs.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GreedyConfig {
    /// Shortest candidate block, in hours.
    pub min_block_hours: u32,
    /// Longest candidate block, in hours.
    pub max_block_hours: u32,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            min_block_hours: 2,
            max_block_hours: 4,
        }
    }
}
