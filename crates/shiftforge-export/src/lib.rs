//! Export and validation for finished shiftforge schedules.
//!
//! This crate turns a solver outcome into the shapes the outside world
//! consumes:
//! - Coalesced schedule blocks and per-worker totals
//! - A self-describing JSON document (round-trip serializable)
//! - CSV views of the block schedule and the hour summary
//! - Flat shift records for the surrounding CRUD layer
//! - A quick validation report with quality classes and coverage gaps

pub mod blocks;
pub mod csv;
pub mod json;
pub mod shifts;
pub mod validator;

pub use blocks::{coalesce, worker_totals, ScheduleBlock, WorkerTotals};
pub use csv::{schedule_csv, worker_summary_csv};
pub use json::{BlockRecord, RunMetadata, ScheduleDocument, SummaryRecord};
pub use shifts::{shift_records, shift_records_json, ShiftRecord};
pub use validator::{quick_validate, CoverageGap, Quality, ValidationReport};
