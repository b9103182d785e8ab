//! Sound cues and the policy deciding when they fire

pub mod cue_policy;

pub use cue_policy::{SoundCue, SoundCuePolicy};
