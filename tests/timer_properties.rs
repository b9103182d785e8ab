//! Property tests for the timer state machine and sound cue policy

use proptest::prelude::*;

use tabata_timer::{
    sound::{SoundCue, SoundCuePolicy},
    state::IntervalType,
    TimerState, WorkoutConfig, WorkoutStage,
};

fn config_strategy() -> impl Strategy<Value = WorkoutConfig> {
    (1u32..=6, 1u32..=15, 1u32..=15, 0u32..=8, 0u32..=8).prop_map(
        |(cycles, work, rest, warmup, cooldown)| {
            WorkoutConfig::new(cycles, work, rest, warmup, cooldown).unwrap()
        },
    )
}

/// Milliseconds still scheduled after the current stage or interval
fn scheduled_after_current(s: &TimerState) -> u64 {
    let work = u64::from(s.work_seconds) * 1000;
    let rest = u64::from(s.rest_seconds) * 1000;
    let cooldown = u64::from(s.cooldown_seconds) * 1000;
    let cycles_left = u64::from(s.total_cycles - s.cycle);
    match s.stage {
        WorkoutStage::Warmup => u64::from(s.total_cycles) * (work + rest) + cooldown,
        WorkoutStage::MainWorkout => match s.interval {
            IntervalType::Work => rest + cycles_left * (work + rest) + cooldown,
            IntervalType::Rest => cycles_left * (work + rest) + cooldown,
        },
        WorkoutStage::Cooldown | WorkoutStage::WorkoutEnded => 0,
    }
}

fn count(cues: &[SoundCue], cue: SoundCue) -> usize {
    cues.iter().filter(|c| **c == cue).count()
}

proptest! {
    #[test]
    fn countdowns_reconcile_and_only_move_forward(
        config in config_strategy(),
        deltas in prop::collection::vec(0u64..7000, 1..120),
    ) {
        let initial = TimerState::new(&config);
        let mut state = initial.clone();
        let mut consumed = 0u64;

        for delta in deltas {
            let next = state.tick(delta);
            consumed += delta;

            prop_assert!(next.total_remaining_ms <= state.total_remaining_ms);
            prop_assert!(next.stage >= state.stage);
            prop_assert!(next.cycle >= 1 && next.cycle <= next.total_cycles);
            prop_assert!(next.cycle >= state.cycle);
            prop_assert_eq!(
                next.total_remaining_ms,
                initial.total_remaining_ms.saturating_sub(consumed)
            );
            prop_assert_eq!(
                next.total_remaining_ms,
                next.stage_remaining_ms + scheduled_after_current(&next)
            );
            state = next;
        }

        if consumed >= initial.total_remaining_ms {
            prop_assert_eq!(state.stage, WorkoutStage::WorkoutEnded);
        } else {
            prop_assert!(state.stage != WorkoutStage::WorkoutEnded);
        }
    }

    #[test]
    fn pausing_freezes_everything(
        config in config_strategy(),
        warm in 0u64..20_000,
        deltas in prop::collection::vec(0u64..5000, 1..50),
    ) {
        let paused = TimerState::new(&config).tick(warm).with_paused(true);
        let mut state = paused.clone();
        for delta in deltas {
            state = state.tick(delta);
        }
        prop_assert_eq!(state, paused);
    }

    #[test]
    fn each_cue_fires_once_per_window(
        config in config_strategy(),
        deltas in prop::collection::vec(200u64..1000, 1..40),
    ) {
        let mut policy = SoundCuePolicy::new();
        let mut state = TimerState::new(&config);
        let mut cues = Vec::new();
        let mut i = 0;

        while !state.is_finished() {
            let delta = deltas[i % deltas.len()];
            cues.extend(policy.on_stage_tick(&state, delta));
            state = state.tick(delta);
            i += 1;
        }

        let cycles = config.cycles() as usize;
        prop_assert_eq!(count(&cues, SoundCue::WorkoutStart), 1);
        prop_assert_eq!(count(&cues, SoundCue::FirstWorkStart), 1);
        prop_assert_eq!(count(&cues, SoundCue::WorkEnd), cycles);
        prop_assert_eq!(count(&cues, SoundCue::RestEnd), cycles - 1);
        prop_assert_eq!(count(&cues, SoundCue::WorkoutEnd), 1);
        prop_assert_eq!(
            count(&cues, SoundCue::CooldownEnd),
            usize::from(config.cooldown_seconds() > 0)
        );
    }
}
