//! Error types for shiftforge

use thiserror::Error;

/// Main error type for shiftforge operations
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A worker record failed validation
    #[error("invalid worker record `{id}`: {reason}")]
    InvalidWorker { id: String, reason: String },

    /// An exam record failed validation
    #[error("invalid exam record for user `{user_id}`: {reason}")]
    InvalidExam { user_id: String, reason: String },

    /// The roster contains no active workers
    #[error("no active workers in the roster")]
    EmptyRoster,

    /// An operating-hour window has zero or negative length
    #[error("operating window for {day} is empty")]
    EmptyOperatingWindow { day: String },

    /// A wall-clock string could not be parsed
    #[error("invalid time `{value}`: {reason}")]
    InvalidTime { value: String, reason: String },

    /// Invalid operation for the current schedule state
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// I/O failure while reading input data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for shiftforge operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
