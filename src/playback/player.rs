// Workout player - Drives a compiled timeline and publishes events on the bus
// Owns the clock and ticker; nothing else may mutate playback state

use super::clock::{MonotonicTime, PlaybackClock, TimeSource};
use super::config::PlayerConfig;
use super::cue::CueMemory;
use super::ticker::Ticker;
use super::PlayerResult;
use crate::messaging::{
    CueInfo, DoneInfo, EventBus, InitInfo, Progress, RoundInfo, SegmentInfo, WorkoutEvent,
};
use crate::workout::{Phase, Segment, Timeline, WorkoutDescription, compile};
use std::rc::Rc;
use std::time::Duration;

/// Player lifecycle
///
/// `Idle → Running ⇄ Paused → Done | Stopped`. `Done` is reached by natural
/// completion without looping; `start()` from `Done` or `Stopped` plays again
/// from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
    Done,
}

impl PlayerState {
    /// Playing or paused mid-workout
    pub fn is_active(&self) -> bool {
        matches!(self, PlayerState::Running | PlayerState::Paused)
    }

    /// Not started, stopped or finished
    pub fn is_stopped(&self) -> bool {
        matches!(self, PlayerState::Idle | PlayerState::Stopped | PlayerState::Done)
    }
}

/// Deterministic workout scheduler
///
/// Every tick samples the playback clock, detects segment and round changes,
/// fires countdown cues and reports progress. Ticks are only a sampling rate:
/// changing `tick_interval_ms` never changes where the workout is.
pub struct WorkoutPlayer {
    title: String,
    total_rounds: u32,
    timeline: Timeline,
    bus: Rc<EventBus>,
    time: Rc<dyn TimeSource>,
    clock: PlaybackClock,
    ticker: Ticker,
    loop_enabled: bool,
    cue_thresholds: Vec<u64>,
    state: PlayerState,

    // Per-visit memory; cleared by stop, seek and loop wrap
    last_segment: Option<usize>,
    last_round: Option<u32>,
    cues: CueMemory,

    laps: u64,
}

impl WorkoutPlayer {
    /// Create a player running on real (monotonic) time
    pub fn new(
        workout: &WorkoutDescription,
        bus: Rc<EventBus>,
        config: PlayerConfig,
    ) -> PlayerResult<Self> {
        Self::with_time_source(workout, bus, config, Rc::new(MonotonicTime::new()))
    }

    /// Create a player on an explicit time source
    ///
    /// Publishes `init` and `meta` before returning, so subscribe first.
    pub fn with_time_source(
        workout: &WorkoutDescription,
        bus: Rc<EventBus>,
        config: PlayerConfig,
        time: Rc<dyn TimeSource>,
    ) -> PlayerResult<Self> {
        config.validate()?;

        let timeline = compile(workout);
        let mut clock =
            PlaybackClock::new(Rc::clone(&time), timeline.total_ms(), config.speed_limits);
        clock.set_speed(config.speed);

        let player = Self {
            title: workout.title.clone(),
            total_rounds: workout.round_count(),
            ticker: Ticker::new(config.tick_interval_ms),
            loop_enabled: config.loop_enabled,
            cue_thresholds: config.cue_thresholds(),
            timeline,
            bus,
            time,
            clock,
            state: PlayerState::Idle,
            last_segment: None,
            last_round: None,
            cues: CueMemory::new(),
            laps: 0,
        };

        log::info!(
            "Loaded '{}': {} segments over {} rounds, {} ms",
            player.title,
            player.timeline.len(),
            player.total_rounds,
            player.timeline.total_ms()
        );

        player.publish(WorkoutEvent::Init(InitInfo {
            workout_type: workout.workout_type.clone(),
            title: workout.title.clone(),
            duration_min: workout.duration_min,
            total_ms: player.timeline.total_ms(),
            rounds: player.total_rounds,
        }));
        player.publish(WorkoutEvent::Meta(workout.metadata_or_default()));

        Ok(player)
    }

    // ---- Controls ----------------------------------------------------------

    /// Start, resume, or restart after stop/done
    ///
    /// Ticks once immediately so subscribers don't wait a full interval.
    pub fn start(&mut self) {
        match self.state {
            PlayerState::Running => return,
            PlayerState::Paused => {
                self.clock.resume();
                log::info!("Resumed '{}' at {:.0} ms", self.title, self.clock.elapsed_ms());
            }
            PlayerState::Idle | PlayerState::Stopped | PlayerState::Done => {
                self.reset_memory();
                self.clock.start();
                log::info!("Starting '{}'", self.title);
            }
        }

        self.state = PlayerState::Running;
        self.arm();
    }

    /// Freeze playback; no-op unless running
    pub fn pause(&mut self) {
        if self.state != PlayerState::Running {
            return;
        }
        self.clock.pause();
        self.ticker.disarm();
        self.state = PlayerState::Paused;
        log::info!("Paused '{}' at {:.0} ms", self.title, self.clock.elapsed_ms());
    }

    /// Halt and rewind; idempotent
    pub fn stop(&mut self) {
        self.ticker.disarm();
        self.clock.stop();
        self.reset_memory();
        if self.state != PlayerState::Stopped {
            log::info!("Stopped '{}'", self.title);
        }
        self.state = PlayerState::Stopped;
    }

    /// Jump to `ms` (clamped to the workout length)
    ///
    /// The next tick treats the target segment as a fresh arrival and re-emits
    /// `round`/`segment`, even if it is the segment we were already in. When
    /// running, that tick happens immediately. Returns the applied position.
    pub fn seek(&mut self, ms: i64) -> u64 {
        let applied = self.clock.seek(ms);
        self.last_segment = None;
        self.last_round = None;
        log::debug!("Seek to {} ms", applied);

        if self.state == PlayerState::Running {
            self.arm();
        }
        applied
    }

    /// Change playback speed; returns the applied (clamped) multiplier
    pub fn set_speed(&mut self, mult: f64) -> f64 {
        self.clock.set_speed(mult)
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    // ---- Driving -----------------------------------------------------------

    /// Tick if the ticker is due; returns whether a tick ran
    pub fn poll(&mut self) -> bool {
        if !self.ticker.is_due(self.time.now_ms()) {
            return false;
        }
        self.fire();
        true
    }

    /// Time until the next scheduled tick; None when the ticker is disarmed
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.ticker.time_until_due(self.time.now_ms())
    }

    /// Block on real time until the player pauses, stops or completes
    pub fn run(&mut self) {
        self.run_with(std::thread::sleep);
    }

    /// Drive ticks with a custom sleep (e.g. advancing a `ManualTime`)
    ///
    /// `sleep` must let at least the requested duration pass on the player's
    /// time source.
    pub fn run_with<F>(&mut self, mut sleep: F)
    where
        F: FnMut(Duration),
    {
        while let Some(wait) = self.time_until_next_tick() {
            if !wait.is_zero() {
                sleep(wait);
            }
            self.fire();
        }
    }

    fn fire(&mut self) {
        self.tick();
        self.ticker.reschedule(self.time.now_ms());
    }

    fn arm(&mut self) {
        self.ticker.arm(self.time.now_ms());
        self.tick();
    }

    /// One evaluation of the clock against the timeline
    ///
    /// Ignored unless running. Never fails: an empty timeline completes on the
    /// first tick.
    pub fn tick(&mut self) {
        if self.state != PlayerState::Running {
            return;
        }

        let total_ms = self.timeline.total_ms();
        let mut t = self.clock.elapsed_ms();

        if t >= total_ms as f64 {
            if self.loop_enabled && total_ms > 0 {
                t %= total_ms as f64;
                self.clock.rebase(t);
                self.laps += 1;
                self.last_segment = None;
                self.last_round = None;
                log::info!("'{}' lap {} complete, wrapping to {:.0} ms", self.title, self.laps, t);
            } else {
                self.finish();
                return;
            }
        }

        let Some(index) = self.timeline.segment_at(t.floor() as u64) else {
            // Contiguous segments cover [0, total); only reachable on a broken timeline
            log::warn!("No segment at {:.0} ms of {} ms", t, total_ms);
            return;
        };

        if self.last_segment != Some(index) {
            self.enter_segment(index);
        }
        self.emit_cues(index, t);
        self.publish(WorkoutEvent::Tick(Progress::at(t, total_ms)));
    }

    fn enter_segment(&mut self, index: usize) {
        let seg = &self.timeline.segments()[index];

        let round = (seg.phase != Phase::Cooldown && self.last_round != Some(seg.round)).then(|| {
            RoundInfo {
                round: seg.round,
                total_rounds: self.total_rounds,
            }
        });
        let info = SegmentInfo::from(seg);

        self.last_segment = Some(index);
        self.last_round = Some(seg.round);
        let visit = self.cues.enter(index);

        log::debug!(
            "Segment {} ({} '{}', round {}) visit {}",
            index,
            seg.phase,
            seg.label,
            seg.round,
            visit.visit
        );

        if let Some(round) = round {
            self.publish(WorkoutEvent::Round(round));
        }
        self.publish(WorkoutEvent::Segment(info));
    }

    fn emit_cues(&mut self, index: usize, t: f64) {
        let seg = &self.timeline.segments()[index];
        if !seg.phase.has_cues() {
            return;
        }

        // Ceil keeps "remaining <= threshold" exact for fractional elapsed time
        let remaining_ms = (seg.end_ms as f64 - t).max(0.0).ceil() as u64;
        let crossed = self.cues.crossed(&self.cue_thresholds, remaining_ms);

        for threshold_ms in crossed {
            self.publish(WorkoutEvent::Cue(CueInfo::new(seg, threshold_ms)));
        }
    }

    fn finish(&mut self) {
        let total_ms = self.timeline.total_ms();
        self.publish(WorkoutEvent::Tick(Progress::at(total_ms as f64, total_ms)));
        self.publish(WorkoutEvent::Done(DoneInfo {
            title: self.title.clone(),
        }));

        self.ticker.disarm();
        self.clock.stop();
        self.reset_memory();
        self.state = PlayerState::Done;
        log::info!("'{}' complete", self.title);
    }

    fn reset_memory(&mut self) {
        self.last_segment = None;
        self.last_round = None;
        self.cues.reset();
    }

    fn publish(&self, event: WorkoutEvent) {
        self.bus.publish(&event);
    }

    // ---- Accessors ---------------------------------------------------------

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Started and not stopped (true while paused)
    pub fn is_running(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlayerState::Paused
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn total_ms(&self) -> u64 {
        self.timeline.total_ms()
    }

    /// Virtual elapsed time as the clock sees it right now
    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    /// Segment entered by the most recent tick
    pub fn current_segment(&self) -> Option<&Segment> {
        self.last_segment.and_then(|index| self.timeline.get(index))
    }

    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// Completed passes through the whole workout while looping
    pub fn laps(&self) -> u64 {
        self.laps
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.ticker.interval_ms()
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }
}
