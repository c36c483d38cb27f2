// Playback - Clock, ticker, cue memory and the workout player state machine

pub mod clock;
pub mod config;
pub mod cue;
pub mod player;
pub mod ticker;

pub use clock::{ManualTime, MonotonicTime, PlaybackClock, SpeedLimits, TimeSource};
pub use config::PlayerConfig;
pub use cue::{CueMemory, VisitKey};
pub use player::{PlayerState, WorkoutPlayer};
pub use ticker::Ticker;

use thiserror::Error;

/// Errors raised while loading or constructing a player
///
/// Playback itself never fails: out-of-range input is clamped instead.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Invalid workout description: {0}")]
    InvalidWorkout(String),

    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
