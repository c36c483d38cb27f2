// Ticker - The player's periodic timer
// Armed while playing, disarmed on pause/stop/done; the next tick is only
// scheduled once the previous one has finished

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Ticker {
    interval_ms: u64,
    next_due_ms: Option<f64>,
}

impl Ticker {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Arm (or re-arm) so the next tick is due one interval from `now_ms`
    pub fn arm(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms as f64);
    }

    pub fn disarm(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        self.next_due_ms.is_some_and(|due| now_ms >= due)
    }

    /// Schedule the following tick after one has completed
    /// Does nothing if the tick disarmed the timer
    pub fn reschedule(&mut self, now_ms: f64) {
        if self.next_due_ms.is_some() {
            self.arm(now_ms);
        }
    }

    /// Time left before the next tick; None when disarmed
    pub fn time_until_due(&self, now_ms: f64) -> Option<Duration> {
        self.next_due_ms
            .map(|due| Duration::from_secs_f64((due - now_ms).max(0.0) / 1000.0))
    }
}
