//! Result of one solver run.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use shiftforge_core::{Evaluation, ScheduleState, ViolationBreakdown};

/// The solver families the driver can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Greedy,
    Ga,
    Sa,
    Csp,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Greedy,
        Algorithm::Ga,
        Algorithm::Sa,
        Algorithm::Csp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::Ga => "GA",
            Algorithm::Sa => "SA",
            Algorithm::Csp => "CSP",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Algorithm::Greedy),
            "ga" => Ok(Algorithm::Ga),
            "sa" => Ok(Algorithm::Sa),
            "csp" => Ok(Algorithm::Csp),
            other => Err(format!("unknown algorithm `{other}`")),
        }
    }
}

/// Best solution found by a run, with its metadata.
///
/// Infeasibility is an outcome, not an error: a run that could not cover
/// every slot still returns its best assignment, and `converged` records
/// whether the solver stopped on its own criterion (penalty 0, stagnation,
/// temperature floor, move exhaustion) rather than a time or iteration cap.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub algorithm: Algorithm,
    pub assignment: ScheduleState,
    pub penalty: f64,
    pub breakdown: ViolationBreakdown,
    pub runtime: Duration,
    pub iterations: u64,
    pub converged: bool,
    pub seed: u64,
}

impl SolveOutcome {
    pub fn new(
        algorithm: Algorithm,
        assignment: ScheduleState,
        evaluation: Evaluation,
        runtime: Duration,
        iterations: u64,
        converged: bool,
        seed: u64,
    ) -> Self {
        Self {
            algorithm,
            assignment,
            penalty: evaluation.penalty,
            breakdown: evaluation.breakdown,
            runtime,
            iterations,
            converged,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parsing_is_case_insensitive() {
        assert_eq!("GA".parse::<Algorithm>().unwrap(), Algorithm::Ga);
        assert_eq!("sa".parse::<Algorithm>().unwrap(), Algorithm::Sa);
        assert_eq!("Csp".parse::<Algorithm>().unwrap(), Algorithm::Csp);
        assert_eq!("greedy".parse::<Algorithm>().unwrap(), Algorithm::Greedy);
        assert!("tabu".parse::<Algorithm>().is_err());
    }
}
