//! Tick loop driving one workout run

use std::{sync::Arc, time::Duration};
use tracing::{debug, info, trace};

use crate::{
    clock::TimeSource,
    error::Result,
    services::SoundPlayer,
    sound::SoundCuePolicy,
    state::TimerCell,
};

use super::supervisor::CancelSignal;

/// Everything the tick loop of one run needs
pub struct WorkoutTicker {
    pub cell: Arc<TimerCell>,
    pub clock: Arc<dyn TimeSource>,
    pub player: Arc<dyn SoundPlayer>,
    /// Fixed tick quantum
    pub interval: Duration,
    /// Clock reading taken when the run was started
    pub started_at: Duration,
}

/// Background task that advances the active timer state until the workout ends or is cancelled
pub async fn workout_tick_task(ticker: WorkoutTicker, mut cancel: CancelSignal) -> Result<()> {
    info!("Starting workout tick loop ({:?} per tick)", ticker.interval);

    let mut policy = SoundCuePolicy::new();
    let mut last_tick = ticker.started_at;

    loop {
        let deadline = last_tick + ticker.interval;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Tick loop cancelled");
                return Ok(());
            }
            _ = ticker.clock.sleep_until(deadline) => {}
        }

        // Only whole milliseconds are consumed; the remainder stays for the next tick
        let elapsed_ms = ticker.clock.now().saturating_sub(last_tick).as_millis() as u64;
        last_tick += Duration::from_millis(elapsed_ms);

        let mut cues = Vec::new();
        let mut transition = None;
        let mut finished = false;

        ticker.cell.update(|state| {
            cues = policy.on_stage_tick(state, elapsed_ms);
            let next = state.tick(elapsed_ms);
            if next.stage != state.stage || next.interval != state.interval || next.cycle != state.cycle {
                transition = Some((next.stage, next.interval, next.cycle));
            }
            finished = next.is_finished();
            trace!(
                "Tick {}ms: total {}ms, stage {}ms",
                elapsed_ms, next.total_remaining_ms, next.stage_remaining_ms
            );
            Some(next)
        });

        if ticker.cell.current().is_none() {
            debug!("Timer state cleared, stopping tick loop");
            return Ok(());
        }

        if let Some((stage, interval, cycle)) = transition {
            info!("Workout moved to {:?} ({:?}), cycle {}", stage, interval, cycle);
        }

        for cue in cues {
            ticker.player.play(cue);
        }

        if finished {
            info!("Workout finished");
            return Ok(());
        }
    }
}
