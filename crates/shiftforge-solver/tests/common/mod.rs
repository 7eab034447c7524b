//! Shared fixtures for the solver integration tests.

use chrono::NaiveDate;

use shiftforge_config::SchedulerConfig;
use shiftforge_core::{
    HourPolicy, PenaltyWeights, Role, ShiftKind, Tier, TimeSlot, Worker,
};

/// Monday of the reference week used throughout the tests.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
}

pub fn worker(id: &str, tier: Tier) -> Worker {
    Worker {
        id: id.into(),
        name: id.to_uppercase(),
        email: format!("{id}@example.edu"),
        role: Role::User,
        tier,
        is_commuter: false,
        is_active: true,
        is_floater: false,
        desired_hours: 15,
        busy: Vec::new(),
    }
}

/// A hand-crafted one-hour slot on the reference Monday.
pub fn slot(index: usize, start_minute: u32, kind: ShiftKind, min: usize, max: usize) -> TimeSlot {
    TimeSlot {
        index,
        date: monday(),
        day: shiftforge_core::time::DayOfWeek::Monday,
        start_minute,
        duration_minutes: 60,
        kind,
        staff_min: min,
        staff_max: max,
    }
}

/// Trimmed solver budgets so the whole suite stays fast.
pub fn fast_config() -> SchedulerConfig {
    let mut config = SchedulerConfig::new();
    config.ga.population_size = 40;
    config.ga.generations = 120;
    config.ga.max_time_secs = 10;
    config.sa.max_iterations = 30_000;
    config.sa.max_time_secs = 10;
    config.csp.max_iterations = 3_000;
    config.csp.max_time_secs = 10;
    config
}

/// Budgets plus policies relaxed for hand-crafted miniature instances:
/// no weekly hour floor, and no run-length term (their slots are too few
/// for 14-hour weeks or 90-minute runs to be reachable).
pub fn tiny_instance_config() -> SchedulerConfig {
    let mut config = fast_config();
    config.hours = HourPolicy {
        min_hours: 0,
        ..HourPolicy::default()
    };
    config.weights = PenaltyWeights {
        shift_length: 0.0,
        ..PenaltyWeights::default()
    };
    config
}
