//! Full JSON export document.
//!
//! The document is self-describing: metadata about the run, the problem
//! instance (workers and slots), the raw per-slot assignment, the coalesced
//! block schedule and per-worker summaries. It deserializes back into the
//! same shape, and re-serializing a parsed document reproduces the original
//! text byte for byte.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shiftforge_core::time::format_minutes;
use shiftforge_core::{
    SchedulingEnvironment, ShiftKind, TimeSlot, ViolationBreakdown, Worker,
};
use shiftforge_solver::SolveOutcome;

use crate::blocks::{coalesce, worker_totals, ScheduleBlock};

/// Run metadata attached to every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub algorithm: String,
    pub runtime_s: f64,
    pub penalty: f64,
    pub violations: ViolationBreakdown,
    pub seed: u64,
    pub converged: bool,
}

/// One coalesced block as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub date: NaiveDate,
    /// `HH:MM` wall clock.
    pub start: String,
    pub end: String,
    pub kind: ShiftKind,
    pub assignees: Vec<String>,
}

impl From<&ScheduleBlock> for BlockRecord {
    fn from(block: &ScheduleBlock) -> Self {
        Self {
            date: block.date,
            start: format_minutes(block.start),
            end: format_minutes(block.end),
            kind: block.kind,
            assignees: block.assignees.clone(),
        }
    }
}

/// Per-worker hour summary as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    pub name: String,
    pub hours: f64,
    pub desired: u32,
}

/// The complete export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    pub metadata: RunMetadata,
    pub workers: Vec<Worker>,
    pub slots: Vec<TimeSlot>,
    /// Worker ids per slot, indexed by `slot_index`.
    pub assignment: Vec<Vec<String>>,
    pub schedule: Vec<BlockRecord>,
    pub worker_summary: Vec<SummaryRecord>,
}

impl ScheduleDocument {
    /// Builds the document for a finished run.
    pub fn build(env: &SchedulingEnvironment, outcome: &SolveOutcome) -> Self {
        let assignment = (0..env.num_slots())
            .map(|s| {
                outcome
                    .assignment
                    .assignees(s)
                    .iter()
                    .map(|&w| env.worker(w).id.clone())
                    .collect()
            })
            .collect();
        let schedule = coalesce(env, &outcome.assignment)
            .iter()
            .map(BlockRecord::from)
            .collect();
        let worker_summary = worker_totals(env, &outcome.assignment)
            .into_iter()
            .map(|t| SummaryRecord {
                id: t.id,
                name: t.name,
                hours: t.assigned_hours,
                desired: t.desired_hours,
            })
            .collect();

        Self {
            metadata: RunMetadata {
                algorithm: outcome.algorithm.label().to_string(),
                runtime_s: outcome.runtime.as_secs_f64(),
                penalty: outcome.penalty,
                violations: outcome.breakdown,
                seed: outcome.seed,
                converged: outcome.converged,
            },
            workers: env.workers().to_vec(),
            slots: env.slots().to_vec(),
            assignment,
            schedule,
            worker_summary,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a previously exported document.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
