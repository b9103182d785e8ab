//! User actions and the queue-level requests they become

use std::fmt;

use serde::{Deserialize, Serialize};

use super::WorkoutConfig;

/// Requests coming from the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Start,
    Pause,
    Resume,
    Reset,
}

impl UserAction {
    pub fn name(self) -> &'static str {
        match self {
            UserAction::Start => "start",
            UserAction::Pause => "pause",
            UserAction::Resume => "resume",
            UserAction::Reset => "reset",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Actions on the session as a whole, consumed by the session task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Start(WorkoutConfig),
    Reset,
}

/// Actions on one running workout, consumed by that run's action task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    Pause,
    Resume,
}
