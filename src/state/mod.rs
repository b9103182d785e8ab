//! State management module
//!
//! Workout configuration, the timer state machine, the cell sharing it
//! between tasks, and the orchestrator that owns a workout session.

pub mod actions;
pub mod app_state;
pub mod display;
pub mod timer_cell;
pub mod timer_state;
pub mod workout_config;

// Re-export main types
pub use actions::{RunAction, SessionAction, UserAction};
pub use app_state::{AppServices, AppState};
pub use timer_cell::TimerCell;
pub use timer_state::{IntervalType, TimerState, WorkoutStage};
pub use workout_config::{
    FieldError, InputField, ValidationErrors, WorkoutConfig, WorkoutInputs, MAX_INPUT_VALUE,
};
