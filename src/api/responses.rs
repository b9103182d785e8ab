//! API response structures

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, TimerState, UserAction};

/// Everything the UI renders, derived from the orchestrator in one go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutView {
    pub timer: Option<TimerState>,
    pub total_time_remaining: String,
    pub stage_and_time: String,
    pub cycle_number: String,
    pub inputs_enabled: bool,
    pub field_errors: BTreeMap<String, String>,
    pub error_message: Option<String>,
}

impl WorkoutView {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            timer: state.snapshot(),
            total_time_remaining: state.format_total_time_remaining(),
            stage_and_time: state.format_stage_and_time(),
            cycle_number: state.format_cycle_number(),
            inputs_enabled: state.inputs_enabled(),
            field_errors: state.field_errors().messages(),
            error_message: state.error_message(),
        }
    }
}

/// API response structure for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub workout: WorkoutView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, workout: WorkoutView) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            workout,
        }
    }

    pub fn ok(message: String, workout: WorkoutView) -> Self {
        Self::new("ok", message, workout)
    }

    pub fn error(message: String, workout: WorkoutView) -> Self {
        Self::new("error", message, workout)
    }
}

/// Status response with last action information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub workout: WorkoutView,
    pub last_action: Option<UserAction>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
