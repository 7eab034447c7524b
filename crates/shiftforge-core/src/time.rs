//! Time model: wall-clock parsing, the Monday-first day ordering and the
//! interval conflict predicate.
//!
//! All wall-clock offsets are minutes from midnight (`u32`). The help desk
//! never operates on Sunday, so [`DayOfWeek`] covers Monday(0)..Saturday(5)
//! and date conversion is fallible.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Minutes in one hour, used throughout for grid conversions.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Parses a `HH:MM` wall-clock string into minutes from midnight.
///
/// # Examples
///
/// ```
/// use shiftforge_core::time::parse_hhmm;
///
/// assert_eq!(parse_hhmm("07:30").unwrap(), 450);
/// assert_eq!(parse_hhmm("20:00").unwrap(), 1200);
/// assert!(parse_hhmm("24:00").is_err());
/// ```
pub fn parse_hhmm(value: &str) -> Result<u32> {
    let invalid = |reason: &str| SchedulerError::InvalidTime {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (h, m) = value
        .split_once(':')
        .ok_or_else(|| invalid("expected HH:MM"))?;
    let hours: u32 = h.parse().map_err(|_| invalid("hours are not a number"))?;
    let minutes: u32 = m.parse().map_err(|_| invalid("minutes are not a number"))?;

    if hours > 23 {
        return Err(invalid("hours out of range"));
    }
    if minutes > 59 {
        return Err(invalid("minutes out of range"));
    }
    Ok(hours * MINUTES_PER_HOUR + minutes)
}

/// Formats minutes from midnight as a `HH:MM` string.
///
/// # Examples
///
/// ```
/// use shiftforge_core::time::format_minutes;
///
/// assert_eq!(format_minutes(450), "07:30");
/// assert_eq!(format_minutes(1200), "20:00");
/// ```
pub fn format_minutes(minutes: u32) -> String {
    format!(
        "{:02}:{:02}",
        minutes / MINUTES_PER_HOUR,
        minutes % MINUTES_PER_HOUR
    )
}

/// Operating days, Monday-first. Sunday is outside operating hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// All operating days in week order.
    pub const ALL: [DayOfWeek; 6] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Zero-based index, Monday = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a calendar date; `None` for Sunday.
    pub fn from_date(date: NaiveDate) -> Option<DayOfWeek> {
        match date.weekday().num_days_from_monday() {
            0 => Some(DayOfWeek::Monday),
            1 => Some(DayOfWeek::Tuesday),
            2 => Some(DayOfWeek::Wednesday),
            3 => Some(DayOfWeek::Thursday),
            4 => Some(DayOfWeek::Friday),
            5 => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A half-open time interval `[start, end)` on a calendar date, in minutes
/// from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub date: NaiveDate,
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(date: NaiveDate, start: u32, end: u32) -> Self {
        Self { date, start, end }
    }

    /// Two intervals conflict iff their dates match and the open ranges
    /// overlap: `s0 < e1 && s1 > e0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use shiftforge_core::time::Interval;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
    /// let exam = Interval::new(date, 540, 660); // 09:00-11:00
    /// let slot = Interval::new(date, 600, 660); // 10:00-11:00
    /// let later = Interval::new(date, 660, 720); // 11:00-12:00
    ///
    /// assert!(exam.conflicts_with(&slot));
    /// assert!(!exam.conflicts_with(&later));
    /// ```
    pub fn conflicts_with(&self, other: &Interval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Interval length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.date,
            format_minutes(self.start),
            format_minutes(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    #[test]
    fn parses_and_formats_wall_clock() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("09:00").unwrap(), 540);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
        assert_eq!(format_minutes(parse_hhmm("17:45").unwrap()), "17:45");
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(parse_hhmm("9").is_err());
        assert!(parse_hhmm("09:60").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("ab:cd").is_err());
    }

    #[test]
    fn day_from_date_skips_sunday() {
        // 2025-12-15 is a Monday
        assert_eq!(DayOfWeek::from_date(date(15)), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::from_date(date(20)), Some(DayOfWeek::Saturday));
        assert_eq!(DayOfWeek::from_date(date(21)), None);
    }

    #[test]
    fn conflict_requires_same_date() {
        let a = Interval::new(date(15), 540, 660);
        let b = Interval::new(date(16), 540, 660);
        assert!(!a.conflicts_with(&b));
        assert!(a.conflicts_with(&a));
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        let a = Interval::new(date(15), 480, 540);
        let b = Interval::new(date(15), 540, 600);
        assert!(!a.conflicts_with(&b));
        assert!(!b.conflicts_with(&a));
    }
}
