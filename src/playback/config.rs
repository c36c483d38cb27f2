// Player configuration - Scheduling parameters, loadable from a RON file

use super::clock::SpeedLimits;
use super::cue::{DEFAULT_CUE_THRESHOLDS_MS, normalize_thresholds};
use super::{PlayerError, PlayerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// UI cadence used when nothing else is configured
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Options for building a `WorkoutPlayer`
///
/// Example `player.ron`:
/// ```text
/// (
///     tick_interval_ms: 100,
///     speed: 2.0,
///     loop_enabled: false,
///     speed_limits: (min: 0.25, max: 8.0),
///     cue_thresholds_ms: [10000, 5000, 3000],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Sampling cadence of the scheduler (not the time source)
    pub tick_interval_ms: u64,
    /// Initial playback speed (clamped to `speed_limits`)
    pub speed: f64,
    /// Restart from the top when the workout ends
    pub loop_enabled: bool,
    pub speed_limits: SpeedLimits,
    /// Remaining-time warnings for work and cooldown segments
    pub cue_thresholds_ms: Vec<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            speed: 1.0,
            loop_enabled: false,
            speed_limits: SpeedLimits::default(),
            cue_thresholds_ms: DEFAULT_CUE_THRESHOLDS_MS.to_vec(),
        }
    }
}

impl PlayerConfig {
    /// Check the options a player cannot run with
    pub fn validate(&self) -> PlayerResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(PlayerError::InvalidConfig(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        if !self.speed_limits.is_valid() {
            return Err(PlayerError::InvalidConfig(format!(
                "speed limits {} must be finite, positive and ordered",
                self.speed_limits
            )));
        }
        if !self.speed.is_finite() {
            return Err(PlayerError::InvalidConfig(format!(
                "speed {} is not a finite number",
                self.speed
            )));
        }
        Ok(())
    }

    /// Thresholds sorted descending, without duplicates or zeros
    pub fn cue_thresholds(&self) -> Vec<u64> {
        if self.cue_thresholds_ms.contains(&0) {
            log::warn!("Ignoring cue threshold of 0 ms, it can never fire");
        }
        normalize_thresholds(&self.cue_thresholds_ms)
    }

    pub fn from_ron_str(text: &str) -> PlayerResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> PlayerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded player config {}", path.as_ref().display());
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> PlayerResult<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> PlayerResult<()> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}
