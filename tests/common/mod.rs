//! Shared harness for driving the orchestrator on virtual time

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tabata_timer::{
    services::{ErrorReporter, SoundPlayer},
    sound::SoundCue,
    AppServices, AppState, ManualClock, TimeSource, TimerError, TimerState, WorkoutInputs,
};

pub const TICK: Duration = Duration::from_millis(50);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Default)]
pub struct RecordingPlayer {
    pub cues: Mutex<Vec<SoundCue>>,
}

impl SoundPlayer for RecordingPlayer {
    fn play(&self, cue: SoundCue) {
        self.cues.lock().unwrap().push(cue);
    }
}

/// Player whose first cue blows up, to exercise task failure handling
#[derive(Default)]
pub struct PanickingPlayer;

impl SoundPlayer for PanickingPlayer {
    fn play(&self, cue: SoundCue) {
        panic!("speaker on fire while playing {}", cue.resource_id());
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<String>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &TimerError) {
        self.reports.lock().unwrap().push(error.to_string());
    }
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub player: Arc<RecordingPlayer>,
    pub reporter: Arc<RecordingReporter>,
    pub state: Arc<AppState>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_player(None)
    }

    /// Harness whose cues go to `player` instead of the recorder
    pub fn with_player(player: Option<Arc<dyn SoundPlayer>>) -> Self {
        let clock = Arc::new(ManualClock::new());
        let recorder = Arc::new(RecordingPlayer::default());
        let reporter = Arc::new(RecordingReporter::default());
        let clock_source: Arc<dyn TimeSource> = clock.clone();
        let error_reporter: Arc<dyn ErrorReporter> = reporter.clone();
        let state = AppState::launch(AppServices {
            clock: clock_source,
            player: player.unwrap_or_else(|| recorder.clone() as Arc<dyn SoundPlayer>),
            reporter: error_reporter,
            tick_interval: TICK,
        });
        Self {
            clock,
            player: recorder,
            reporter,
            state,
        }
    }

    pub fn tabata(&self) {
        let errors = self.state.set_inputs(WorkoutInputs::new("8", "20", "10", "0", "0"));
        assert!(errors.is_empty(), "unexpected errors: {}", errors);
    }

    pub fn cues(&self) -> Vec<SoundCue> {
        self.player.cues.lock().unwrap().clone()
    }

    /// Wait (on real time, bounded) until the published snapshot satisfies `check`
    pub async fn wait_for_state<F>(&self, check: F) -> Option<TimerState>
    where
        F: Fn(&Option<TimerState>) -> bool,
    {
        let mut rx = self.state.subscribe();
        let snapshot = tokio::time::timeout(SETTLE_TIMEOUT, rx.wait_for(|state| check(state)))
            .await
            .expect("timer state did not settle in time")
            .expect("timer state channel closed")
            .clone();
        snapshot
    }

    /// Advance virtual time and wait until the tick loop has consumed all of it
    pub async fn advance(&self, by: Duration) -> TimerState {
        let before = self
            .state
            .snapshot()
            .expect("advance requires a started workout")
            .total_remaining_ms;
        let expected = before.saturating_sub(by.as_millis() as u64);

        self.clock.advance(by);
        self.wait_for_state(|state| {
            state
                .as_ref()
                .is_some_and(|s| s.total_remaining_ms == expected)
        })
        .await
        .expect("workout disappeared while advancing")
    }

    /// Step through virtual time in `step` increments until the workout ends
    pub async fn run_to_end(&self, step: Duration) -> TimerState {
        loop {
            let state = self.advance(step).await;
            if state.is_finished() {
                return state;
            }
        }
    }
}
