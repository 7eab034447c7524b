//! Loader-facing records and roster validation.
//!
//! The surrounding storage layer hands the core a list of worker records and
//! a list of exam records; [`build_roster`] validates them and produces the
//! immutable [`Worker`] roster the environment runs on.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::worker::{Role, Tier, Worker};
use crate::error::{Result, SchedulerError};
use crate::time::{parse_hhmm, DayOfWeek, Interval};

/// Default weekly target when a record omits `desired_hours`.
const DEFAULT_DESIRED_HOURS: u32 = 15;

/// A worker record as delivered by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Tier label, e.g. `"Tier 2"`.
    pub position: String,
    #[serde(default)]
    pub is_commuter: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub desired_hours: Option<u32>,
    #[serde(default)]
    pub is_floater: bool,
}

fn default_active() -> bool {
    true
}

/// An exam record as delivered by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub user_id: String,
    pub date: NaiveDate,
    /// `HH:MM` wall clock.
    pub start_time: String,
    /// `HH:MM` wall clock.
    pub end_time: String,
}

/// Validates records and assembles the roster, sorted by worker id for
/// deterministic iteration.
///
/// Sunday exams are skipped with a warning (the desk is closed); exams for
/// unknown workers are skipped likewise. When `week_start` (the Monday the
/// schedule begins on) is given, exams dated outside that week are kept but
/// warned about, since they cannot conflict with any slot. Records with an
/// unknown tier label, an out-of-domain `desired_hours`, a duplicate id, or
/// overlapping busy intervals are rejected.
///
/// # Errors
///
/// Returns the first offending record as [`SchedulerError::InvalidWorker`]
/// or [`SchedulerError::InvalidExam`]; an all-inactive roster yields
/// [`SchedulerError::EmptyRoster`].
pub fn build_roster(
    records: &[WorkerRecord],
    exams: &[ExamRecord],
    week_start: Option<NaiveDate>,
) -> Result<Vec<Worker>> {
    let week_end = week_start.and_then(|start| start.checked_add_days(Days::new(7)));
    let mut busy_by_worker: HashMap<&str, Vec<Interval>> = HashMap::new();
    let known: HashMap<&str, ()> = records.iter().map(|r| (r.id.as_str(), ())).collect();

    for exam in exams {
        if !known.contains_key(exam.user_id.as_str()) {
            warn!(user_id = %exam.user_id, "skipping exam for unknown worker");
            continue;
        }
        if DayOfWeek::from_date(exam.date).is_none() {
            warn!(user_id = %exam.user_id, date = %exam.date, "skipping Sunday exam; help desk is closed");
            continue;
        }
        if let (Some(start), Some(end)) = (week_start, week_end) {
            if exam.date < start || exam.date >= end {
                warn!(
                    user_id = %exam.user_id,
                    date = %exam.date,
                    week_start = %start,
                    "exam dated outside the scheduled week"
                );
            }
        }
        let start = parse_hhmm(&exam.start_time).map_err(|e| SchedulerError::InvalidExam {
            user_id: exam.user_id.clone(),
            reason: e.to_string(),
        })?;
        let end = parse_hhmm(&exam.end_time).map_err(|e| SchedulerError::InvalidExam {
            user_id: exam.user_id.clone(),
            reason: e.to_string(),
        })?;
        if start >= end {
            return Err(SchedulerError::InvalidExam {
                user_id: exam.user_id.clone(),
                reason: format!("start {} is not before end {}", exam.start_time, exam.end_time),
            });
        }
        busy_by_worker
            .entry(exam.user_id.as_str())
            .or_default()
            .push(Interval::new(exam.date, start, end));
    }

    let mut workers = Vec::with_capacity(records.len());
    let mut seen: HashMap<&str, ()> = HashMap::new();

    for record in records {
        if seen.insert(record.id.as_str(), ()).is_some() {
            return Err(SchedulerError::InvalidWorker {
                id: record.id.clone(),
                reason: "duplicate worker id".into(),
            });
        }
        let tier = Tier::from_position(&record.position).ok_or_else(|| {
            SchedulerError::InvalidWorker {
                id: record.id.clone(),
                reason: format!("unknown position `{}`", record.position),
            }
        })?;
        let desired_hours = record.desired_hours.unwrap_or(DEFAULT_DESIRED_HOURS);
        if !(10..=20).contains(&desired_hours) {
            return Err(SchedulerError::InvalidWorker {
                id: record.id.clone(),
                reason: format!("desired_hours {desired_hours} outside [10, 20]"),
            });
        }

        let mut busy = busy_by_worker.remove(record.id.as_str()).unwrap_or_default();
        busy.sort_by_key(|b| (b.date, b.start, b.end));
        if let Some(pair) = busy.windows(2).find(|p| p[0].conflicts_with(&p[1])) {
            return Err(SchedulerError::InvalidExam {
                user_id: record.id.clone(),
                reason: format!("overlapping busy intervals {} and {}", pair[0], pair[1]),
            });
        }

        workers.push(Worker {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role,
            tier,
            is_commuter: record.is_commuter,
            is_active: record.is_active,
            is_floater: record.is_floater,
            desired_hours,
            busy,
        });
    }

    workers.sort_by(|a, b| a.id.cmp(&b.id));
    if !workers.iter().any(|w| w.is_active) {
        return Err(SchedulerError::EmptyRoster);
    }
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> WorkerRecord {
        WorkerRecord {
            id: id.into(),
            name: format!("Worker {id}"),
            email: String::new(),
            role: Role::User,
            position: "Tier 1".into(),
            is_commuter: false,
            is_active: true,
            desired_hours: Some(15),
            is_floater: false,
        }
    }

    fn exam(user: &str, day: u32, start: &str, end: &str) -> ExamRecord {
        ExamRecord {
            user_id: user.into(),
            date: NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    #[test]
    fn builds_sorted_roster_with_busy_intervals() {
        let workers = build_roster(
            &[record("b"), record("a")],
            &[exam("a", 15, "09:00", "11:00")],
            None,
        )
        .unwrap();
        assert_eq!(workers[0].id, "a");
        assert_eq!(workers[1].id, "b");
        assert_eq!(workers[0].busy.len(), 1);
        assert_eq!(workers[0].busy[0].start, 540);
    }

    #[test]
    fn skips_sunday_exams() {
        // 2025-12-21 is a Sunday
        let workers =
            build_roster(&[record("a")], &[exam("a", 21, "09:00", "11:00")], None).unwrap();
        assert!(workers[0].busy.is_empty());
    }

    #[test]
    fn out_of_week_exam_is_kept_with_a_warning() {
        // 2025-12-22 is the Monday after the scheduled week.
        let week_start = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let workers = build_roster(
            &[record("a")],
            &[exam("a", 22, "09:00", "11:00")],
            Some(week_start),
        )
        .unwrap();
        // Warned, not dropped: the interval stays but conflicts with no slot.
        assert_eq!(workers[0].busy.len(), 1);
    }

    #[test]
    fn defaults_desired_hours() {
        let mut r = record("a");
        r.desired_hours = None;
        let workers = build_roster(&[r], &[], None).unwrap();
        assert_eq!(workers[0].desired_hours, 15);
    }

    #[test]
    fn rejects_bad_records() {
        let mut bad_tier = record("a");
        bad_tier.position = "Supervisor".into();
        assert!(build_roster(&[bad_tier], &[], None).is_err());

        let mut bad_hours = record("a");
        bad_hours.desired_hours = Some(25);
        assert!(build_roster(&[bad_hours], &[], None).is_err());

        assert!(build_roster(&[record("a"), record("a")], &[], None).is_err());

        assert!(build_roster(&[record("a")], &[exam("a", 15, "11:00", "09:00")], None).is_err());

        let overlapping = [exam("a", 15, "09:00", "11:00"), exam("a", 15, "10:00", "12:00")];
        assert!(build_roster(&[record("a")], &overlapping, None).is_err());
    }

    #[test]
    fn all_inactive_roster_is_an_input_error() {
        let mut r = record("a");
        r.is_active = false;
        assert!(matches!(
            build_roster(&[r], &[], None),
            Err(SchedulerError::EmptyRoster)
        ));
    }
}
