//! Domain model: workers, shift slots and operating policies.

pub mod policy;
pub mod records;
pub mod slot;
pub mod worker;

pub use policy::{HourPolicy, PenaltyWeights, StaffingPolicy};
pub use records::{build_roster, ExamRecord, WorkerRecord};
pub use slot::{ScheduleType, ShiftKind, SlotCatalog, TimeSlot};
pub use worker::{Role, Tier, Worker};
