//! Consumers that apply queued user actions one at a time

use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::Result,
    state::{AppState, RunAction, SessionAction, TimerCell},
};

use super::{action_queue::ActionReceiver, supervisor::CancelSignal};

/// Background task applying Pause/Resume to one run's timer state
pub async fn run_action_task(
    cell: Arc<TimerCell>,
    mut actions: ActionReceiver<RunAction>,
    mut cancel: CancelSignal,
) -> Result<()> {
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Run action consumer cancelled");
                return Ok(());
            }
            next = actions.recv() => next,
        };
        let Some((seq, action)) = next else {
            return Ok(());
        };

        let paused = action == RunAction::Pause;
        if cell.update(|state| Some(state.with_paused(paused))) {
            info!("Workout {}", if paused { "paused" } else { "resumed" });
        } else {
            debug!("{:?} left the timer unchanged", action);
        }
        actions.mark_applied(seq);
    }
}

/// Background task applying Start/Reset to the session
pub async fn session_action_task(
    state: Arc<AppState>,
    mut actions: ActionReceiver<SessionAction>,
    mut cancel: CancelSignal,
) -> Result<()> {
    info!("Starting session action consumer");

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Session action consumer cancelled");
                return Ok(());
            }
            next = actions.recv() => next,
        };
        let Some((seq, action)) = next else {
            return Ok(());
        };

        match action {
            SessionAction::Start(config) => state.begin_run(config).await,
            SessionAction::Reset => state.end_run().await,
        }
        actions.mark_applied(seq);
    }
}
