//! Platform collaborators injected into the orchestrator
//!
//! Sound playback and error reporting live behind traits so the timer core
//! never talks to audio hardware or a crash reporter directly.

pub mod error_reporter;
pub mod sound_player;

// Re-export main types
pub use error_reporter::{ErrorReporter, TracingErrorReporter};
pub use sound_player::{check_player_available, CommandSoundPlayer, LogSoundPlayer, SoundPlayer};
