//! Worker model: roster records and the availability predicate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Interval;

/// Worker seniority. Tier 1-2 prefer Window shifts, Tier 3-4 prefer Remote;
/// Tier 4 additionally carries an administrative role (informational only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
    Four,
}

impl Tier {
    /// Parses the roster `position` field, e.g. `"Tier 2"`.
    pub fn from_position(position: &str) -> Option<Tier> {
        match position.trim() {
            "Tier 1" => Some(Tier::One),
            "Tier 2" => Some(Tier::Two),
            "Tier 3" => Some(Tier::Three),
            "Tier 4" => Some(Tier::Four),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
            Tier::Four => 4,
        }
    }

    /// True for Tier 1-2, who prefer on-site Window coverage.
    pub fn prefers_window(self) -> bool {
        matches!(self, Tier::One | Tier::Two)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.number())
    }
}

/// External role of the account. The scheduler never consults this; it is
/// carried through for the surrounding CRUD layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A student worker on the help-desk roster.
///
/// Workers are immutable for the duration of an optimization run. Busy
/// intervals hold exams and other commitments, non-overlapping per worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Stable opaque key, unique across the roster.
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub tier: Tier,
    /// Commuters cannot be assigned any slot starting before the cutoff.
    pub is_commuter: bool,
    /// Inactive workers are excluded from every pool.
    pub is_active: bool,
    /// Reserved flag from the roster schema; not consulted by the evaluator.
    pub is_floater: bool,
    /// Target weekly hours in `[10, 20]`; fairness deviates against this.
    pub desired_hours: u32,
    /// Exams and other commitments, ordered, non-overlapping.
    pub busy: Vec<Interval>,
}

impl Worker {
    /// Availability predicate for a candidate interval: the worker must be
    /// active, respect the commuter cutoff and have no conflicting busy
    /// interval.
    pub fn is_available(&self, interval: &Interval, commuter_cutoff_minute: u32) -> bool {
        if !self.is_active {
            return false;
        }
        if self.is_commuter && interval.start < commuter_cutoff_minute {
            return false;
        }
        !self.busy.iter().any(|b| b.conflicts_with(interval))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
    }

    fn worker() -> Worker {
        Worker {
            id: "w1".into(),
            name: "Avery".into(),
            email: "avery@example.edu".into(),
            role: Role::User,
            tier: Tier::Two,
            is_commuter: false,
            is_active: true,
            is_floater: false,
            desired_hours: 15,
            busy: vec![Interval::new(monday(), 540, 660)],
        }
    }

    #[test]
    fn inactive_worker_is_never_available() {
        let mut w = worker();
        w.is_active = false;
        let free = Interval::new(monday(), 720, 780);
        assert!(!w.is_available(&free, 540));
    }

    #[test]
    fn commuter_blocked_before_cutoff() {
        let mut w = worker();
        w.is_commuter = true;
        let early = Interval::new(monday(), 480, 540);
        let nine = Interval::new(monday(), 540, 600);
        assert!(!w.is_available(&early, 540));
        // 09:00 itself conflicts with the exam, so probe a later hour
        let noon = Interval::new(monday(), 720, 780);
        assert!(w.is_available(&noon, 540));
        assert!(!w.is_available(&nine, 540));
    }

    #[test]
    fn busy_interval_blocks_overlap_only() {
        let w = worker();
        let during = Interval::new(monday(), 600, 660);
        let after = Interval::new(monday(), 660, 720);
        assert!(!w.is_available(&during, 540));
        assert!(w.is_available(&after, 540));
    }

    #[test]
    fn tier_preferences() {
        assert!(Tier::One.prefers_window());
        assert!(!Tier::Four.prefers_window());
        assert_eq!(Tier::from_position("Tier 3"), Some(Tier::Three));
        assert_eq!(Tier::from_position("Manager"), None);
    }
}
