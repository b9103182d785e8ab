//! One-shot sound cue tracking
//!
//! The policy owns no audio. It only decides which cues a tick should
//! trigger; the tick loop hands them to a `SoundPlayer`.

use serde::Serialize;

use crate::state::{IntervalType, TimerState, WorkoutStage};

/// Cues fire when the stage would have less than this left after the tick
const END_CUE_THRESHOLD_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    WorkoutStart,
    FirstWorkStart,
    WorkEnd,
    RestEnd,
    WorkoutEnd,
    CooldownEnd,
}

impl SoundCue {
    /// Opaque identifier of the audio resource played for this cue
    pub fn resource_id(self) -> &'static str {
        match self {
            SoundCue::WorkoutStart => "gong",
            SoundCue::FirstWorkStart => "airhorn",
            SoundCue::WorkEnd => "whistle",
            SoundCue::RestEnd => "buzzer",
            SoundCue::WorkoutEnd => "referee_whistle",
            SoundCue::CooldownEnd => "chime",
        }
    }
}

/// Which cues have already fired in their current window
#[derive(Debug, Clone, Default)]
pub struct SoundCuePolicy {
    workout_start_played: bool,
    first_work_start_played: bool,
    work_end_played: bool,
    rest_end_played: bool,
    cooldown_end_played: bool,
    /// Cycle the per-cycle flags belong to
    cycle: Option<u32>,
}

impl SoundCuePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues triggered by a tick of `elapsed_ms` starting from `state`, in priority order
    pub fn on_stage_tick(&mut self, state: &TimerState, elapsed_ms: u64) -> Vec<SoundCue> {
        let mut cues = Vec::new();
        if state.is_paused || state.is_finished() {
            return cues;
        }

        if self.cycle != Some(state.cycle) {
            self.cycle = Some(state.cycle);
            self.work_end_played = false;
            self.rest_end_played = false;
        }

        if !self.workout_start_played {
            self.workout_start_played = true;
            cues.push(SoundCue::WorkoutStart);
        }

        let in_work = state.stage == WorkoutStage::MainWorkout && state.interval == IntervalType::Work;
        let in_rest = state.stage == WorkoutStage::MainWorkout && state.interval == IntervalType::Rest;
        let ending = state.stage_remaining_ms.saturating_sub(elapsed_ms) < END_CUE_THRESHOLD_MS;

        if in_work && state.cycle == 1 && !self.first_work_start_played {
            self.first_work_start_played = true;
            cues.push(SoundCue::FirstWorkStart);
        }

        if in_work && ending && !self.work_end_played {
            self.work_end_played = true;
            cues.push(SoundCue::WorkEnd);
        }

        if in_rest && ending && !self.rest_end_played {
            self.rest_end_played = true;
            cues.push(if state.is_final_cycle() {
                SoundCue::WorkoutEnd
            } else {
                SoundCue::RestEnd
            });
        }

        if state.stage == WorkoutStage::Cooldown && ending && !self.cooldown_end_played {
            self.cooldown_end_played = true;
            cues.push(SoundCue::CooldownEnd);
        }

        cues
    }
}
