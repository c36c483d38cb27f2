// Playback clock - Virtual elapsed time under pause/seek/speed changes
// Ticks only sample this clock; they are never the time source

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// Wall-clock source, in milliseconds since an arbitrary origin
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Real monotonic time (std `Instant`)
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven time for tests and offline stepping
///
/// Clones share the same underlying instant, so a test can keep one copy and
/// hand another to the player.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<f64>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl TimeSource for ManualTime {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Allowed playback speed range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    pub min: f64,
    pub max: f64,
}

impl SpeedLimits {
    pub const DEFAULT_MIN: f64 = 0.25;
    pub const DEFAULT_MAX: f64 = 4.0;

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Limits are usable when finite, positive and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// Clamp a multiplier into range; None for NaN
    pub fn clamp(&self, mult: f64) -> Option<f64> {
        if mult.is_nan() {
            None
        } else {
            Some(mult.clamp(self.min, self.max))
        }
    }
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

impl fmt::Display for SpeedLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x, {}x]", self.min, self.max)
    }
}

/// Virtual playback clock
///
/// `elapsed = base + (now - anchor) * speed` while running and not paused,
/// otherwise `base`. Every state change folds the running elapsed time into
/// `base` first, so changes never make time jump.
pub struct PlaybackClock {
    time: Rc<dyn TimeSource>,
    total_ms: u64,
    base_elapsed_ms: f64,
    anchor_ms: f64,
    speed: f64,
    limits: SpeedLimits,
    running: bool,
    paused: bool,
}

impl PlaybackClock {
    pub fn new(time: Rc<dyn TimeSource>, total_ms: u64, limits: SpeedLimits) -> Self {
        let anchor_ms = time.now_ms();
        Self {
            time,
            total_ms,
            base_elapsed_ms: 0.0,
            anchor_ms,
            speed: 1.0,
            limits,
            running: false,
            paused: false,
        }
    }

    /// Current virtual elapsed time (may exceed total while running)
    pub fn elapsed_ms(&self) -> f64 {
        if self.running && !self.paused {
            let delta = (self.time.now_ms() - self.anchor_ms).max(0.0);
            self.base_elapsed_ms + delta * self.speed
        } else {
            self.base_elapsed_ms
        }
    }

    /// Start counting; starting from stopped resets elapsed to 0
    pub fn start(&mut self) {
        if !self.running {
            self.base_elapsed_ms = 0.0;
        }
        self.anchor_ms = self.time.now_ms();
        self.running = true;
        self.paused = false;
    }

    /// Freeze elapsed time; no-op unless running and not paused
    pub fn pause(&mut self) {
        if !self.running || self.paused {
            return;
        }
        self.base_elapsed_ms = self.elapsed_ms();
        self.paused = true;
    }

    /// Continue from the frozen value; no-op unless paused
    pub fn resume(&mut self) {
        if !self.running || !self.paused {
            return;
        }
        self.anchor_ms = self.time.now_ms();
        self.paused = false;
    }

    /// Back to the initial state
    pub fn stop(&mut self) {
        self.base_elapsed_ms = 0.0;
        self.anchor_ms = self.time.now_ms();
        self.running = false;
        self.paused = false;
    }

    /// Jump to `ms`, clamped to `[0, total]`; running/paused state is kept
    /// Returns the applied position
    pub fn seek(&mut self, ms: i64) -> u64 {
        let clamped = ms.clamp(0, self.total_ms.min(i64::MAX as u64) as i64) as u64;
        if clamped as i64 != ms {
            log::debug!("Seek target {} ms clamped to {} ms", ms, clamped);
        }
        self.rebase(clamped as f64);
        clamped
    }

    /// Set elapsed time without clamping (used when wrapping a loop)
    pub fn rebase(&mut self, elapsed_ms: f64) {
        self.base_elapsed_ms = elapsed_ms.max(0.0);
        self.anchor_ms = self.time.now_ms();
    }

    /// Change speed, clamped to the configured limits
    /// Returns the applied multiplier
    pub fn set_speed(&mut self, mult: f64) -> f64 {
        let Some(clamped) = self.limits.clamp(mult) else {
            log::warn!("Ignoring invalid playback speed {}", mult);
            return self.speed;
        };
        if clamped != mult {
            log::debug!("Speed {}x clamped to {}x (limits {})", mult, clamped, self.limits);
        }

        self.rebase(self.elapsed_ms());
        self.speed = clamped;
        clamped
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn limits(&self) -> SpeedLimits {
        self.limits
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl fmt::Debug for PlaybackClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackClock")
            .field("elapsed_ms", &self.elapsed_ms())
            .field("total_ms", &self.total_ms)
            .field("speed", &self.speed)
            .field("running", &self.running)
            .field("paused", &self.paused)
            .finish()
    }
}
