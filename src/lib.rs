//! Tabata Timer - a tick-driven interval workout timer
//!
//! This library provides the workout state machine (warmup, work/rest
//! cycles, cooldown), one-shot sound cues, a serialized user action channel
//! and the orchestrator tying them to a swappable time source.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod services;
pub mod sound;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{ManualClock, SystemClock, TimeSource};
pub use config::Config;
pub use error::{Result, TimerError};
pub use state::{AppServices, AppState, TimerState, UserAction, WorkoutConfig, WorkoutInputs, WorkoutStage};
pub use utils::signals::shutdown_signal;
