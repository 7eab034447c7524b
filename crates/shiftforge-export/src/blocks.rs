//! Block derivation: coalescing a final assignment into the contiguous
//! blocks users see, plus per-worker hour totals.

use chrono::NaiveDate;

use shiftforge_core::time::DayOfWeek;
use shiftforge_core::{ScheduleState, SchedulingEnvironment, ShiftKind, Tier, WorkerIx};

/// A reported block: a maximal contiguous same-kind span with everyone who
/// works the whole span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBlock {
    pub date: NaiveDate,
    pub day: DayOfWeek,
    /// Minutes from midnight.
    pub start: u32,
    pub end: u32,
    pub kind: ShiftKind,
    /// Worker ids, sorted.
    pub assignees: Vec<String>,
}

/// Coalesces per-worker contiguous runs and merges identical spans, so each
/// reported block carries its full crew. Blocks are ordered by
/// `(date, start, kind)`.
pub fn coalesce(env: &SchedulingEnvironment, state: &ScheduleState) -> Vec<ScheduleBlock> {
    let mut merged: Vec<ScheduleBlock> = Vec::new();
    for (worker, runs) in env.worker_runs(state) {
        let id = env.worker(worker).id.clone();
        for run in runs {
            match merged.iter_mut().find(|b| {
                b.date == run.date && b.kind == run.kind && b.start == run.start && b.end == run.end
            }) {
                Some(block) => block.assignees.push(id.clone()),
                None => merged.push(ScheduleBlock {
                    date: run.date,
                    day: DayOfWeek::from_date(run.date).expect("operating days exclude Sunday"),
                    start: run.start,
                    end: run.end,
                    kind: run.kind,
                    assignees: vec![id.clone()],
                }),
            }
        }
    }

    for block in &mut merged {
        block.assignees.sort();
    }
    merged.sort_by(|a, b| {
        (a.date, a.start, a.kind, a.end).cmp(&(b.date, b.start, b.kind, b.end))
    });
    merged
}

/// Per-worker totals for the summary exports.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerTotals {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub desired_hours: u32,
    pub assigned_hours: f64,
}

impl WorkerTotals {
    /// Assigned minus desired, signed.
    pub fn difference(&self) -> f64 {
        self.assigned_hours - f64::from(self.desired_hours)
    }
}

/// Totals for every worker in roster order.
pub fn worker_totals(env: &SchedulingEnvironment, state: &ScheduleState) -> Vec<WorkerTotals> {
    env.workers()
        .iter()
        .enumerate()
        .map(|(ix, w)| WorkerTotals {
            id: w.id.clone(),
            name: w.name.clone(),
            tier: w.tier,
            desired_hours: w.desired_hours,
            assigned_hours: state.hours_of(ix as WorkerIx),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use shiftforge_core::{HourPolicy, PenaltyWeights, Role, TimeSlot, Worker};

    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
    }

    fn worker(id: &str) -> Worker {
        Worker {
            id: id.into(),
            name: id.to_uppercase(),
            email: String::new(),
            role: Role::User,
            tier: Tier::One,
            is_commuter: false,
            is_active: true,
            is_floater: false,
            desired_hours: 15,
            busy: Vec::new(),
        }
    }

    fn hour_slot(index: usize, hour: u32, kind: ShiftKind) -> TimeSlot {
        TimeSlot {
            index,
            date: monday(),
            day: DayOfWeek::Monday,
            start_minute: hour * 60,
            duration_minutes: 60,
            kind,
            staff_min: 1,
            staff_max: 2,
        }
    }

    fn env() -> SchedulingEnvironment {
        SchedulingEnvironment::from_parts(
            vec![worker("a"), worker("b")],
            vec![
                hour_slot(0, 9, ShiftKind::Window),
                hour_slot(1, 10, ShiftKind::Window),
                hour_slot(2, 11, ShiftKind::Window),
                hour_slot(3, 9, ShiftKind::Remote),
            ],
            HourPolicy::default(),
            PenaltyWeights::default(),
        )
        .unwrap()
    }

    #[test]
    fn contiguous_hours_become_one_block() {
        let e = env();
        let mut state = e.empty_state();
        state.assign(e.slots(), 0, 0);
        state.assign(e.slots(), 1, 0);
        state.assign(e.slots(), 2, 0);

        let blocks = coalesce(&e, &state);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start, 540);
        assert_eq!(blocks[0].end, 720);
        assert_eq!(blocks[0].assignees, vec!["a".to_string()]);
    }

    #[test]
    fn identical_spans_merge_their_crews() {
        let e = env();
        let mut state = e.empty_state();
        for w in [0u16, 1] {
            state.assign(e.slots(), 0, w);
            state.assign(e.slots(), 1, w);
        }

        let blocks = coalesce(&e, &state);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].assignees, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn different_kinds_stay_separate_blocks() {
        let e = env();
        let mut state = e.empty_state();
        state.assign(e.slots(), 0, 0); // Window 09:00
        state.assign(e.slots(), 3, 1); // Remote 09:00

        let blocks = coalesce(&e, &state);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, ShiftKind::Window);
        assert_eq!(blocks[1].kind, ShiftKind::Remote);
    }

    #[test]
    fn a_gap_splits_the_block() {
        let e = env();
        let mut state = e.empty_state();
        state.assign(e.slots(), 0, 0);
        state.assign(e.slots(), 2, 0); // skips 10:00

        let blocks = coalesce(&e, &state);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn totals_track_hours_and_difference() {
        let e = env();
        let mut state = e.empty_state();
        state.assign(e.slots(), 0, 0);
        state.assign(e.slots(), 1, 0);

        let totals = worker_totals(&e, &state);
        assert_eq!(totals[0].assigned_hours, 2.0);
        assert_eq!(totals[0].difference(), -13.0);
        assert_eq!(totals[1].assigned_hours, 0.0);
    }
}
