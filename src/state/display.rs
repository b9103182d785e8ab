//! Display strings derived from timer state
//!
//! All conversions floor milliseconds to whole seconds. None of this feeds
//! back into the countdown itself.

use super::{IntervalType, TimerState, WorkoutStage};

/// Format milliseconds as `MM:SS`, flooring to whole seconds
pub fn format_clock(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Seconds shown for the current stage.
///
/// A freshly entered stage would otherwise flash its full nominal duration
/// for one tick, so a value equal to the nominal duration shows one less.
pub fn stage_display_seconds(state: &TimerState) -> u64 {
    let seconds = state.stage_remaining_ms / 1000;
    let nominal = u64::from(state.stage_duration_seconds());
    if seconds > 0 && seconds == nominal {
        seconds - 1
    } else {
        seconds
    }
}

pub fn stage_label(state: &TimerState) -> &'static str {
    match state.stage {
        WorkoutStage::Warmup => "Warmup",
        WorkoutStage::MainWorkout => match state.interval {
            IntervalType::Work => "Work",
            IntervalType::Rest => "Rest",
        },
        WorkoutStage::Cooldown => "Cooldown",
        WorkoutStage::WorkoutEnded => "Finished",
    }
}

/// e.g. `Work: 00:15`
pub fn format_stage_and_time(state: &TimerState) -> String {
    format!(
        "{}: {}",
        stage_label(state),
        format_clock(stage_display_seconds(state) * 1000)
    )
}

/// e.g. `3/8`
pub fn format_cycle_number(state: &TimerState) -> String {
    format!("{}/{}", state.cycle, state.total_cycles)
}
