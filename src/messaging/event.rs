// Workout events - Everything the player publishes on the bus
// Payload field names match the wire format consumed by the display layer

use crate::workout::{Intensity, Phase, Segment, WorkoutMetadata};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Event name, used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Init,
    Meta,
    Round,
    Segment,
    Cue,
    Tick,
    Done,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Init,
        EventKind::Meta,
        EventKind::Round,
        EventKind::Segment,
        EventKind::Cue,
        EventKind::Tick,
        EventKind::Done,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Init => "init",
            EventKind::Meta => "meta",
            EventKind::Round => "round",
            EventKind::Segment => "segment",
            EventKind::Cue => "cue",
            EventKind::Tick => "tick",
            EventKind::Done => "done",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when subscribing to an unknown event name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event name: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the "workout:" prefix used by browser-side listeners
        let name = s.strip_prefix("workout:").unwrap_or(s);
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// Published once at player construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitInfo {
    pub workout_type: String,
    pub title: String,
    pub duration_min: Option<f64>,
    pub total_ms: u64,
    pub rounds: u32,
}

/// Published when an exercise round is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundInfo {
    pub round: u32,
    pub total_rounds: u32,
}

/// Published when the current segment changes (or is re-entered after a seek)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentInfo {
    pub phase: Phase,
    pub round: u32,
    pub index_in_round: u32,
    pub exercise: String,
    pub intensity: Option<Intensity>,
    pub seg_start_ms: u64,
    pub seg_end_ms: u64,
    pub seg_duration_ms: u64,
}

impl From<&Segment> for SegmentInfo {
    fn from(seg: &Segment) -> Self {
        Self {
            phase: seg.phase,
            round: seg.round,
            index_in_round: seg.index_in_round,
            exercise: seg.label.clone(),
            intensity: seg.intensity,
            seg_start_ms: seg.start_ms,
            seg_end_ms: seg.end_ms,
            seg_duration_ms: seg.duration_ms(),
        }
    }
}

/// Countdown notification ("10s left")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CueInfo {
    pub phase: Phase,
    pub exercise: String,
    pub round: u32,
    pub label: String,
    pub threshold_ms: u64,
}

impl CueInfo {
    pub fn new(seg: &Segment, threshold_ms: u64) -> Self {
        Self {
            phase: seg.phase,
            exercise: seg.label.clone(),
            round: seg.round,
            label: cue_label(threshold_ms),
            threshold_ms,
        }
    }
}

/// "10s left", "2.5s left"
pub fn cue_label(threshold_ms: u64) -> String {
    format!("{}s left", threshold_ms as f64 / 1000.0)
}

/// Continuous progress, emitted on every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    /// Fraction in [0, 1]; 0 for an empty workout
    pub progress: f64,
}

impl Progress {
    pub fn at(elapsed_ms: f64, total_ms: u64) -> Self {
        let elapsed = elapsed_ms.max(0.0).floor() as u64;
        let progress = if total_ms == 0 {
            0.0
        } else {
            (elapsed_ms / total_ms as f64).clamp(0.0, 1.0)
        };

        Self {
            elapsed_ms: elapsed,
            remaining_ms: total_ms.saturating_sub(elapsed),
            progress,
        }
    }
}

/// Published once when playback completes without looping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoneInfo {
    pub title: String,
}

/// Domain event carried by the bus
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WorkoutEvent {
    Init(InitInfo),
    Meta(WorkoutMetadata),
    Round(RoundInfo),
    Segment(SegmentInfo),
    Cue(CueInfo),
    Tick(Progress),
    Done(DoneInfo),
}

impl WorkoutEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WorkoutEvent::Init(_) => EventKind::Init,
            WorkoutEvent::Meta(_) => EventKind::Meta,
            WorkoutEvent::Round(_) => EventKind::Round,
            WorkoutEvent::Segment(_) => EventKind::Segment,
            WorkoutEvent::Cue(_) => EventKind::Cue,
            WorkoutEvent::Tick(_) => EventKind::Tick,
            WorkoutEvent::Done(_) => EventKind::Done,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Serialize as a single JSON object (`{"event": "tick", ...}`)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
