//! Wall-clock budget checked at outer loop boundaries.

use std::time::{Duration, Instant};

/// A solver's wall-clock budget.
///
/// Checked once per outer iteration; moves and evaluations are atomic, so
/// there is no mid-iteration cancellation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use shiftforge_solver::Deadline;
///
/// let deadline = Deadline::new(Duration::from_secs(30));
/// assert!(!deadline.expired());
/// ```
#[derive(Debug, Clone)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
