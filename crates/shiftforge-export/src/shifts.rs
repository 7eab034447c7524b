//! Shift-record export: the flat per-block records consumed by the
//! surrounding CRUD layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shiftforge_core::time::format_minutes;
use shiftforge_core::ShiftKind;

use crate::blocks::ScheduleBlock;

/// One block as a shift record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub date: NaiveDate,
    /// `HH:MM` wall clock.
    pub start_time: String,
    pub end_time: String,
    pub assigned_to: Vec<String>,
    pub shift_type: ShiftKind,
    pub notes: String,
}

/// Converts coalesced blocks into shift records, stamping the generating
/// algorithm into the notes.
pub fn shift_records(blocks: &[ScheduleBlock], algorithm: &str) -> Vec<ShiftRecord> {
    blocks
        .iter()
        .map(|block| ShiftRecord {
            date: block.date,
            start_time: format_minutes(block.start),
            end_time: format_minutes(block.end),
            assigned_to: block.assignees.clone(),
            shift_type: block.kind,
            notes: format!("Auto-assigned by {algorithm}"),
        })
        .collect()
}

/// Pretty-printed JSON for a shift-record list.
pub fn shift_records_json(records: &[ShiftRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use shiftforge_core::time::DayOfWeek;

    use super::*;

    #[test]
    fn records_carry_times_and_notes() {
        let blocks = vec![ScheduleBlock {
            date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            day: DayOfWeek::Monday,
            start: 540,
            end: 780,
            kind: ShiftKind::Remote,
            assignees: vec!["w01".into(), "w02".into()],
        }];

        let records = shift_records(&blocks, "SA");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_time, "09:00");
        assert_eq!(records[0].end_time, "13:00");
        assert_eq!(records[0].assigned_to, vec!["w01", "w02"]);
        assert_eq!(records[0].notes, "Auto-assigned by SA");

        let json = shift_records_json(&records).unwrap();
        let parsed: Vec<ShiftRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }
}
