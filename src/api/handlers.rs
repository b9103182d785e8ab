//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{AppState, UserAction, WorkoutInputs},
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse, WorkoutView};

type ActionResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Query parameters accepted by the action endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ActionParams {
    /// Block until the action has been applied
    #[serde(default)]
    pub wait: bool,
}

/// Map dispatch failures onto HTTP status codes
fn status_for(e: &TimerError) -> StatusCode {
    match e {
        TimerError::InvalidConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TimerError::NoActiveRun { .. } => StatusCode::CONFLICT,
        TimerError::ActionTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        TimerError::QueueClosed { .. } => StatusCode::SERVICE_UNAVAILABLE,
        TimerError::TaskFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn dispatch(state: &AppState, action: UserAction, params: ActionParams) -> ActionResult {
    match state.dispatch(action, params.wait).await {
        Ok(()) => {
            info!("{} endpoint called", action);
            Ok(Json(ApiResponse::ok(
                format!("{} accepted", action),
                WorkoutView::from_state(state),
            )))
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!("Failed to {}: {}", action, e);
            } else {
                warn!("Rejected {}: {}", action, e);
            }
            Err((
                status,
                Json(ApiResponse::error(e.to_string(), WorkoutView::from_state(state))),
            ))
        }
    }
}

/// Handle PUT /inputs - Store raw workout inputs and report per-field errors
pub async fn inputs_handler(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<WorkoutInputs>,
) -> Json<ApiResponse> {
    let errors = state.set_inputs(inputs);
    let message = if errors.is_empty() {
        "Inputs valid".to_string()
    } else {
        format!("Invalid inputs: {}", errors)
    };
    Json(ApiResponse::ok(message, WorkoutView::from_state(&state)))
}

/// Handle POST /start - Start a workout from the stored inputs
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActionParams>,
) -> ActionResult {
    dispatch(&state, UserAction::Start, params).await
}

/// Handle POST /pause - Pause the active workout
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActionParams>,
) -> ActionResult {
    dispatch(&state, UserAction::Pause, params).await
}

/// Handle POST /resume - Resume the active workout
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActionParams>,
) -> ActionResult {
    dispatch(&state, UserAction::Resume, params).await
}

/// Handle POST /reset - Discard the active workout
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActionParams>,
) -> ActionResult {
    dispatch(&state, UserAction::Reset, params).await
}

/// Handle GET /status - Return the current workout view
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.last_action();
    Json(StatusResponse {
        workout: WorkoutView::from_state(&state),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
