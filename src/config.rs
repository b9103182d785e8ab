//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "tabata-timer")]
#[command(about = "A Tabata interval timer with an HTTP control surface")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Tick quantum of the workout loop in milliseconds
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: u64,

    /// External program used to play cue sounds (e.g. paplay); cues are only logged when unset
    #[arg(long)]
    pub sound_command: Option<String>,

    /// Directory holding the `<cue>.ogg` sound files
    #[arg(long, default_value = "sounds")]
    pub sound_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
