use std::path::PathBuf;

use clap::Parser;
use workout_player::PlayerConfig;

#[derive(Parser, Debug)]
#[command(name = "workout_player", version, about = "Play a workout timeline in real time")]
pub struct Args {
    /// Workout JSON file (defaults to the built-in "Full Body HIIT Blast")
    pub workout: Option<PathBuf>,

    /// Player configuration file (RON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Playback speed multiplier, clamped to the configured limits
    #[arg(long)]
    pub speed: Option<f64>,

    /// Scheduler tick interval in milliseconds
    #[arg(long = "tick-ms")]
    pub tick_ms: Option<u64>,

    /// Restart from the top when the workout ends (runs until interrupted)
    #[arg(long = "loop")]
    pub loop_enabled: bool,

    /// Print every event as a JSON line on stdout
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Command-line flags override the config file
    pub fn apply(&self, config: &mut PlayerConfig) {
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.loop_enabled {
            config.loop_enabled = true;
        }
    }
}
