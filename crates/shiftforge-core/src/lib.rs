//! shiftforge Core - Problem model and evaluator for help-desk scheduling
//!
//! This crate provides the fundamental pieces every solver builds on:
//! - Time model (wall-clock parsing, day grid, interval conflicts)
//! - Domain model (workers, shift slots, operating policies, loader records)
//! - Mutable schedule state with cached per-worker hour tallies
//! - The scheduling environment: availability pools and the penalty evaluator

pub mod domain;
pub mod env;
pub mod error;
pub mod schedule;
pub mod time;

pub use domain::{
    build_roster, ExamRecord, HourPolicy, PenaltyWeights, Role, ScheduleType, ShiftKind,
    SlotCatalog, StaffingPolicy, Tier, TimeSlot, Worker, WorkerRecord,
};
pub use env::{Evaluation, Run, SchedulingEnvironment, ViolationBreakdown};
pub use error::{Result, SchedulerError};
pub use schedule::{ScheduleState, WorkerIx};
pub use time::{format_minutes, parse_hhmm, DayOfWeek, Interval};
