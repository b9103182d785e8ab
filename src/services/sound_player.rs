//! Sound playback collaborators

use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::sound::SoundCue;

/// Plays the audio resource behind a cue. Must not block the caller.
pub trait SoundPlayer: Send + Sync {
    fn play(&self, cue: SoundCue);
}

/// Player that only records cues in the log
#[derive(Debug, Default, Clone)]
pub struct LogSoundPlayer;

impl SoundPlayer for LogSoundPlayer {
    fn play(&self, cue: SoundCue) {
        info!("Sound cue: {:?} ({})", cue, cue.resource_id());
    }
}

/// Player that hands `<sound_dir>/<resource>.ogg` to an external program such as `paplay`
#[derive(Debug, Clone)]
pub struct CommandSoundPlayer {
    pub program: String,
    pub sound_dir: PathBuf,
}

impl CommandSoundPlayer {
    pub fn new(program: impl Into<String>, sound_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sound_dir: sound_dir.into(),
        }
    }

    pub fn resource_path(&self, cue: SoundCue) -> PathBuf {
        self.sound_dir.join(format!("{}.ogg", cue.resource_id()))
    }
}

impl SoundPlayer for CommandSoundPlayer {
    fn play(&self, cue: SoundCue) {
        let program = self.program.clone();
        let path = self.resource_path(cue);
        debug!("Playing {} via {}", path.display(), program);

        // Playback outlives the tick that triggered it
        tokio::spawn(async move {
            match Command::new(&program).arg(&path).output().await {
                Ok(output) if output.status.success() => {}
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("{} failed for {}: {}", program, path.display(), stderr.trim());
                }
                Err(e) => warn!("Failed to execute {}: {}", program, e),
            }
        });
    }
}

/// Check that the configured player program can be launched at all
pub async fn check_player_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|e| format!("Sound player '{}' is not available: {}", program, e))?;

    info!("Sound player {} is available", program);
    Ok(())
}
