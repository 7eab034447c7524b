//! CSV exporters for the block schedule and the worker-hour summary.

use std::fmt::Write as _;

use shiftforge_core::time::format_minutes;

use crate::blocks::{ScheduleBlock, WorkerTotals};

/// Renders the block schedule as CSV, one row per block with assignees
/// joined by `|`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use shiftforge_core::time::DayOfWeek;
/// use shiftforge_core::ShiftKind;
/// use shiftforge_export::{schedule_csv, ScheduleBlock};
///
/// let block = ScheduleBlock {
///     date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
///     day: DayOfWeek::Monday,
///     start: 540,
///     end: 720,
///     kind: ShiftKind::Window,
///     assignees: vec!["w01".into(), "w04".into()],
/// };
/// let csv = schedule_csv(&[block]);
/// assert!(csv.contains("2025-12-15,Monday,09:00,12:00,Window,w01|w04"));
/// ```
pub fn schedule_csv(blocks: &[ScheduleBlock]) -> String {
    let mut output = String::new();
    writeln!(output, "date,day,start,end,kind,assignees").unwrap();
    for block in blocks {
        writeln!(
            output,
            "{},{},{},{},{},{}",
            block.date,
            block.day,
            format_minutes(block.start),
            format_minutes(block.end),
            block.kind,
            block.assignees.join("|"),
        )
        .unwrap();
    }
    output
}

/// Renders per-worker totals as CSV with a signed difference column.
pub fn worker_summary_csv(totals: &[WorkerTotals]) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "id,name,tier,desired_hours,assigned_hours,difference"
    )
    .unwrap();
    for t in totals {
        writeln!(
            output,
            "{},{},{},{},{},{:+}",
            t.id,
            t.name,
            t.tier.number(),
            t.desired_hours,
            t.assigned_hours,
            t.difference(),
        )
        .unwrap();
    }
    output
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use shiftforge_core::time::DayOfWeek;
    use shiftforge_core::{ShiftKind, Tier};

    use super::*;

    #[test]
    fn schedule_rows_are_ordered_and_joined() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let blocks = vec![
            ScheduleBlock {
                date,
                day: DayOfWeek::Tuesday,
                start: 480,
                end: 720,
                kind: ShiftKind::Remote,
                assignees: vec!["a".into(), "b".into(), "c".into()],
            },
            ScheduleBlock {
                date,
                day: DayOfWeek::Tuesday,
                start: 720,
                end: 960,
                kind: ShiftKind::Window,
                assignees: vec!["d".into()],
            },
        ];

        let csv = schedule_csv(&blocks);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,day,start,end,kind,assignees");
        assert_eq!(lines[1], "2025-12-16,Tuesday,08:00,12:00,Remote,a|b|c");
        assert_eq!(lines[2], "2025-12-16,Tuesday,12:00,16:00,Window,d");
    }

    #[test]
    fn summary_difference_is_signed() {
        let totals = vec![
            WorkerTotals {
                id: "a".into(),
                name: "A".into(),
                tier: Tier::One,
                desired_hours: 15,
                assigned_hours: 17.0,
            },
            WorkerTotals {
                id: "b".into(),
                name: "B".into(),
                tier: Tier::Three,
                desired_hours: 15,
                assigned_hours: 12.0,
            },
        ];

        let csv = worker_summary_csv(&totals);
        assert!(csv.contains("a,A,1,15,17,+2"));
        assert!(csv.contains("b,B,3,15,12,-3"));
    }
}
