//! Background tasks module
//!
//! The tick loop, the action consumers and the supervision they run under.

pub mod action_consumer;
pub mod action_queue;
pub mod supervisor;
pub mod workout_ticker;

// Re-export main types and functions
pub use action_consumer::{run_action_task, session_action_task};
pub use action_queue::{action_queue, ActionQueue, ActionReceiver};
pub use supervisor::{cancellation, CancelHandle, CancelSignal, SupervisedTask, TaskSupervisor};
pub use workout_ticker::{workout_tick_task, WorkoutTicker};
