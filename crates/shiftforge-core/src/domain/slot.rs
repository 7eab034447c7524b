//! Shift slot catalog: the canonical list of atomic one-hour coverage units
//! the solvers assign workers to.
//!
//! Finals week covers five fixed dates (Mon-Thu 07:30-20:00, Fri
//! 07:30-17:00); a regular week adds Saturday 10:00-18:00. Each operating
//! hour yields one Window and one Remote slot carrying the per-kind staffing
//! bounds. Days opening on the half hour emit whole-hour slots from the next
//! full hour, matching the deployed grid.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::policy::StaffingPolicy;
use crate::error::{Result, SchedulerError};
use crate::time::{DayOfWeek, Interval, MINUTES_PER_HOUR};

/// The two sub-shifts every covered hour carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    /// On-site desk coverage.
    Window,
    /// Virtual help-desk coverage.
    Remote,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 2] = [ShiftKind::Window, ShiftKind::Remote];

    pub fn label(self) -> &'static str {
        match self {
            ShiftKind::Window => "Window",
            ShiftKind::Remote => "Remote",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which weekly calendar to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Finals,
    Regular,
}

impl ScheduleType {
    pub fn label(self) -> &'static str {
        match self {
            ScheduleType::Finals => "finals",
            ScheduleType::Regular => "regular",
        }
    }

    /// Operating window for a day in minutes from midnight, or `None` when
    /// the desk is closed.
    pub fn operating_window(self, day: DayOfWeek) -> Option<(u32, u32)> {
        let open_close = match day {
            DayOfWeek::Monday | DayOfWeek::Tuesday | DayOfWeek::Wednesday | DayOfWeek::Thursday => {
                (450, 1200) // 07:30-20:00
            }
            DayOfWeek::Friday => (450, 1020), // 07:30-17:00
            DayOfWeek::Saturday => match self {
                ScheduleType::Finals => return None,
                ScheduleType::Regular => (600, 1080), // 10:00-18:00
            },
        };
        Some(open_close)
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An atomic unit of coverage the solvers assign workers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 0-based position in the catalog.
    pub index: usize,
    pub date: NaiveDate,
    pub day: DayOfWeek,
    /// Start in minutes from midnight.
    pub start_minute: u32,
    pub duration_minutes: u32,
    pub kind: ShiftKind,
    pub staff_min: usize,
    pub staff_max: usize,
}

impl TimeSlot {
    pub fn end_minute(&self) -> u32 {
        self.start_minute + self.duration_minutes
    }

    /// Start hour of day (floor), used by hour-grained rules.
    pub fn start_hour(&self) -> u32 {
        self.start_minute / MINUTES_PER_HOUR
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes) / f64::from(MINUTES_PER_HOUR)
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.date, self.start_minute, self.end_minute())
    }
}

/// The full, ordered slot list for one week.
///
/// Slots are ordered by `(date, start, kind)` with Window before Remote, and
/// `TimeSlot::index` always equals the slot's position, so iteration order
/// is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCatalog {
    schedule_type: ScheduleType,
    week_start: NaiveDate,
    slots: Vec<TimeSlot>,
}

impl SlotCatalog {
    /// Builds the hourly catalog for the week beginning at `week_start`
    /// (which must be a Monday).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidState`] if `week_start` is not a
    /// Monday, and [`SchedulerError::EmptyOperatingWindow`] if a configured
    /// window contains no whole operating hour.
    pub fn for_week(
        schedule_type: ScheduleType,
        week_start: NaiveDate,
        staffing: &StaffingPolicy,
    ) -> Result<SlotCatalog> {
        if DayOfWeek::from_date(week_start) != Some(DayOfWeek::Monday) {
            return Err(SchedulerError::InvalidState(format!(
                "week start {week_start} is not a Monday"
            )));
        }

        let mut slots = Vec::new();
        for day in DayOfWeek::ALL {
            let Some((open, close)) = schedule_type.operating_window(day) else {
                continue;
            };
            // First whole hour at or after opening; e.g. 07:30 -> 08:00.
            let first_hour = open.div_ceil(MINUTES_PER_HOUR);
            let last_hour = close / MINUTES_PER_HOUR;
            if first_hour >= last_hour {
                return Err(SchedulerError::EmptyOperatingWindow {
                    day: day.name().to_string(),
                });
            }

            let date = week_start
                .checked_add_days(Days::new(day.index() as u64))
                .expect("week dates fit the calendar");
            for hour in first_hour..last_hour {
                for kind in ShiftKind::ALL {
                    let (staff_min, staff_max) = staffing.bounds(kind);
                    slots.push(TimeSlot {
                        index: slots.len(),
                        date,
                        day,
                        start_minute: hour * MINUTES_PER_HOUR,
                        duration_minutes: MINUTES_PER_HOUR,
                        kind,
                        staff_min,
                        staff_max,
                    });
                }
            }
        }

        Ok(SlotCatalog {
            schedule_type,
            week_start,
            slots,
        })
    }

    pub fn schedule_type(&self) -> ScheduleType {
        self.schedule_type
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Consumes the catalog, returning the slot list.
    pub fn into_slots(self) -> Vec<TimeSlot> {
        self.slots
    }
}
