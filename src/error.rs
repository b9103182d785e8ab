//! Error types for the workout timer

use thiserror::Error;

use crate::state::ValidationErrors;

/// Errors surfaced to callers of the orchestrator and by background tasks
#[derive(Error, Debug)]
pub enum TimerError {
    /// One or more workout inputs failed validation; Start is rejected
    #[error("Invalid workout configuration: {0}")]
    InvalidConfig(ValidationErrors),

    /// An in-run action was dispatched while no workout is running
    #[error("Cannot {action}: no active workout")]
    NoActiveRun { action: &'static str },

    /// A waited-for action was not observed as applied within the wait budget
    #[error("Timed out waiting for {action} to be applied after {waited_ms}ms")]
    ActionTimeout { action: &'static str, waited_ms: u64 },

    /// The consumer for an action queue has gone away
    #[error("Action queue for {target} is closed")]
    QueueClosed { target: &'static str },

    /// A background task failed or panicked
    #[error("{task} task failed: {message}")]
    TaskFailed { task: String, message: String },
}

/// Result type alias for TimerError
pub type Result<T, E = TimerError> = std::result::Result<T, E>;
