//! Quick validation: quality classification, critical-constraint check and
//! coverage-gap listing for a finished schedule.

use std::fmt::Write as _;

use chrono::NaiveDate;

use shiftforge_core::time::format_minutes;
use shiftforge_core::{
    ScheduleState, SchedulingEnvironment, ShiftKind, ViolationBreakdown, WorkerIx,
};

/// Penalty below which a schedule is considered excellent.
const EXCELLENT_LIMIT: f64 = 500.0;
/// Penalty above which a schedule needs manual review.
const REVIEW_LIMIT: f64 = 1500.0;

/// Quality class by total penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Penalty 0.
    Perfect,
    /// Below 500.
    Excellent,
    /// 500 to 1500.
    Good,
    /// Above 1500.
    NeedsReview,
}

impl Quality {
    pub fn from_penalty(penalty: f64) -> Quality {
        if penalty == 0.0 {
            Quality::Perfect
        } else if penalty < EXCELLENT_LIMIT {
            Quality::Excellent
        } else if penalty <= REVIEW_LIMIT {
            Quality::Good
        } else {
            Quality::NeedsReview
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quality::Perfect => "PERFECT",
            Quality::Excellent => "EXCELLENT - ready to use",
            Quality::Good => "GOOD - minor issues",
            Quality::NeedsReview => "NEEDS REVIEW - has issues",
        }
    }

    /// Acceptable for publication without manual intervention.
    pub fn is_acceptable(self) -> bool {
        !matches!(self, Quality::NeedsReview)
    }
}

/// A slot that missed its staffing minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageGap {
    pub slot_index: usize,
    pub date: NaiveDate,
    pub start: u32,
    pub kind: ShiftKind,
    pub staffed: usize,
    pub staff_min: usize,
}

/// The validation report for one schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub quality: Quality,
    pub penalty: f64,
    pub breakdown: ViolationBreakdown,
    pub all_critical_pass: bool,
    pub gaps: Vec<CoverageGap>,
    /// `(min, max, mean)` over workers with any hours.
    pub hour_spread: Option<(f64, f64, f64)>,
}

/// Evaluates and classifies a schedule.
pub fn quick_validate(env: &SchedulingEnvironment, state: &ScheduleState) -> ValidationReport {
    let evaluation = env.evaluate(state);

    let gaps = env
        .uncovered_slots(state)
        .into_iter()
        .map(|i| {
            let slot = env.slot(i);
            CoverageGap {
                slot_index: i,
                date: slot.date,
                start: slot.start_minute,
                kind: slot.kind,
                staffed: state.staff_count(i),
                staff_min: slot.staff_min,
            }
        })
        .collect();

    let hours: Vec<f64> = (0..env.num_workers())
        .map(|w| state.hours_of(w as WorkerIx))
        .filter(|&h| h > 0.0)
        .collect();
    let hour_spread = if hours.is_empty() {
        None
    } else {
        let min = hours.iter().copied().fold(f64::INFINITY, f64::min);
        let max = hours.iter().copied().fold(0.0, f64::max);
        let mean = hours.iter().sum::<f64>() / hours.len() as f64;
        Some((min, max, mean))
    };

    ValidationReport {
        quality: Quality::from_penalty(evaluation.penalty),
        penalty: evaluation.penalty,
        breakdown: evaluation.breakdown,
        all_critical_pass: evaluation.breakdown.all_critical_pass(),
        gaps,
        hour_spread,
    }
}

impl ValidationReport {
    /// Plain-text report in the shape admins review after a run.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        writeln!(out, "SCHEDULE VALIDATION").unwrap();
        writeln!(out, "Penalty: {:.2}", self.penalty).unwrap();
        writeln!(out, "Status:  {}", self.quality.label()).unwrap();

        writeln!(out, "\nCritical constraints:").unwrap();
        for (name, count) in self.breakdown.critical() {
            let mark = if count == 0 { "ok " } else { "FAIL" };
            writeln!(out, "  [{mark}] {name}: {count}").unwrap();
        }

        let warnings: Vec<(&str, u32)> = self
            .breakdown
            .warnings()
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .collect();
        if !warnings.is_empty() {
            writeln!(out, "\nWarnings:").unwrap();
            for (name, count) in warnings {
                writeln!(out, "  {name}: {count}").unwrap();
            }
        }

        if !self.gaps.is_empty() {
            writeln!(out, "\nUncovered slots:").unwrap();
            for gap in &self.gaps {
                writeln!(
                    out,
                    "  {} {} {} ({}/{})",
                    gap.date,
                    format_minutes(gap.start),
                    gap.kind,
                    gap.staffed,
                    gap.staff_min,
                )
                .unwrap();
            }
        }

        if let Some((min, max, mean)) = self.hour_spread {
            writeln!(
                out,
                "\nWorker hours: min {min:.1} / max {max:.1} / avg {mean:.1}"
            )
            .unwrap();
        }

        let verdict = if self.all_critical_pass && self.quality.is_acceptable() {
            "VERDICT: schedule approved for use"
        } else {
            "VERDICT: schedule needs improvement"
        };
        writeln!(out, "\n{verdict}").unwrap();
        out
    }
}
