//! Workout timer state and the tick function that advances it
//!
//! A `TimerState` is an immutable snapshot. Every tick produces a complete
//! replacement value; nothing mutates a snapshot in place.
//!
//! ```text
//! Warmup -> MainWorkout (Work <-> Rest, per cycle) -> Cooldown -> WorkoutEnded
//! ```
//!
//! Time that a tick consumes beyond the end of a stage is carried into the
//! next stage, so the per-stage countdowns always reconcile with the
//! whole-workout countdown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::WorkoutConfig;

/// Coarse phase of a workout. Ordering follows the only legal direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStage {
    Warmup,
    MainWorkout,
    Cooldown,
    WorkoutEnded,
}

/// Sub-period of one cycle inside `MainWorkout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalType {
    Work,
    Rest,
}

/// Outcome of running a stage countdown against an elapsed budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Countdown {
    /// The stage still has this many milliseconds left
    Running(u64),
    /// The stage hit zero; `overshoot_ms` belongs to whatever comes next
    Finished { overshoot_ms: u64 },
}

/// Single place where stage boundaries are crossed. Reaching exactly zero finishes the stage.
pub(crate) fn chop(remaining_ms: u64, elapsed_ms: u64) -> Countdown {
    if elapsed_ms < remaining_ms {
        Countdown::Running(remaining_ms - elapsed_ms)
    } else {
        Countdown::Finished {
            overshoot_ms: elapsed_ms - remaining_ms,
        }
    }
}

/// Snapshot of a running workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub total_remaining_ms: u64,
    pub is_paused: bool,
    pub interval: IntervalType,
    /// 1-indexed, never above `total_cycles`
    pub cycle: u32,
    pub total_cycles: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
    /// Time left in the current warmup, work/rest interval or cooldown
    pub stage_remaining_ms: u64,
    pub warmup_seconds: u32,
    pub cooldown_seconds: u32,
    pub stage: WorkoutStage,
}

impl TimerState {
    /// Fresh state for a workout that is about to start
    pub fn new(config: &WorkoutConfig) -> Self {
        Self {
            total_remaining_ms: config.total_duration_ms(),
            is_paused: false,
            interval: IntervalType::Work,
            cycle: 1,
            total_cycles: config.cycles(),
            work_seconds: config.work_seconds(),
            rest_seconds: config.rest_seconds(),
            stage_remaining_ms: seconds_to_ms(config.warmup_seconds()),
            warmup_seconds: config.warmup_seconds(),
            cooldown_seconds: config.cooldown_seconds(),
            stage: WorkoutStage::Warmup,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.stage == WorkoutStage::WorkoutEnded
    }

    pub fn is_final_cycle(&self) -> bool {
        self.cycle >= self.total_cycles
    }

    /// Full length of the stage or interval currently counting down
    pub fn stage_duration_seconds(&self) -> u32 {
        match self.stage {
            WorkoutStage::Warmup => self.warmup_seconds,
            WorkoutStage::MainWorkout => match self.interval {
                IntervalType::Work => self.work_seconds,
                IntervalType::Rest => self.rest_seconds,
            },
            WorkoutStage::Cooldown => self.cooldown_seconds,
            WorkoutStage::WorkoutEnded => 0,
        }
    }

    pub fn with_paused(&self, is_paused: bool) -> Self {
        Self {
            is_paused,
            ..self.clone()
        }
    }

    /// Advance the workout by `elapsed_ms`. A paused timer is returned unchanged.
    pub fn tick(&self, elapsed_ms: u64) -> Self {
        if self.is_paused {
            return self.clone();
        }

        let mut next = self.clone();
        next.total_remaining_ms = self.total_remaining_ms.saturating_sub(elapsed_ms);

        let mut budget = elapsed_ms;
        loop {
            if next.stage == WorkoutStage::WorkoutEnded {
                next.stage_remaining_ms = 0;
                break;
            }
            match chop(next.stage_remaining_ms, budget) {
                Countdown::Running(remaining_ms) => {
                    next.stage_remaining_ms = remaining_ms;
                    break;
                }
                Countdown::Finished { overshoot_ms } => {
                    next.enter_next_stage();
                    budget = overshoot_ms;
                }
            }
        }

        next
    }

    /// Move to whatever follows the current stage, with that stage's full duration loaded
    fn enter_next_stage(&mut self) {
        match (self.stage, self.interval) {
            (WorkoutStage::Warmup, _) => {
                self.stage = WorkoutStage::MainWorkout;
                self.interval = IntervalType::Work;
                self.cycle = 1;
                self.stage_remaining_ms = seconds_to_ms(self.work_seconds);
            }
            (WorkoutStage::MainWorkout, IntervalType::Work) => {
                self.interval = IntervalType::Rest;
                self.stage_remaining_ms = seconds_to_ms(self.rest_seconds);
            }
            (WorkoutStage::MainWorkout, IntervalType::Rest) if !self.is_final_cycle() => {
                self.cycle = (self.cycle + 1).min(self.total_cycles);
                self.interval = IntervalType::Work;
                self.stage_remaining_ms = seconds_to_ms(self.work_seconds);
            }
            (WorkoutStage::MainWorkout, IntervalType::Rest) => {
                self.stage = WorkoutStage::Cooldown;
                self.stage_remaining_ms = seconds_to_ms(self.cooldown_seconds);
            }
            (WorkoutStage::Cooldown, _) => {
                self.stage = WorkoutStage::WorkoutEnded;
                self.stage_remaining_ms = 0;
            }
            (WorkoutStage::WorkoutEnded, _) => {}
        }
        debug!(
            "Entered {:?} ({:?}) cycle {}/{}",
            self.stage, self.interval, self.cycle, self.total_cycles
        );
    }
}

fn seconds_to_ms(seconds: u32) -> u64 {
    u64::from(seconds) * 1000
}
