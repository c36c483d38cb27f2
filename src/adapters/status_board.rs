// Status board - Display view model fed from workout events
// Holds only strings and numbers a widget layer can render directly

use crate::messaging::{Subscriber, SubscriberError, WorkoutEvent};
use serde::Serialize;

/// "MM:SS", counting partial seconds up (9.2 s left shows "00:10")
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms.div_ceil(1000);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Everything the workout panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub title: String,
    pub workout_type: String,
    pub duration_label: String,
    /// "r / total"; empty until the first round starts
    pub rounds: String,
    pub exercise: String,
    /// "Intensity: HIGH"; None hides the badge
    pub intensity_badge: Option<String>,
    pub equipment: String,
    pub zones: String,
    pub goal: String,
    pub time_left: String,
    /// Progress through the current segment, 0..=100
    pub segment_percent: u8,
    /// Progress through the whole workout, 0..=1
    pub overall_progress: f64,
    pub done: bool,
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            title: "Workout Session".to_string(),
            workout_type: "HIIT".to_string(),
            duration_label: String::new(),
            rounds: String::new(),
            exercise: "Exercise".to_string(),
            intensity_badge: None,
            equipment: "bodyweight".to_string(),
            zones: String::new(),
            goal: "goal: general fitness".to_string(),
            time_left: format_clock(0),
            segment_percent: 0,
            overall_progress: 0.0,
            done: false,
        }
    }
}

/// Subscriber that keeps a `StatusView` current
///
/// Share it with `EventBus::subscribe_shared` to read the view between ticks.
#[derive(Debug, Default)]
pub struct StatusBoard {
    view: StatusView,
    segment_span: Option<(u64, u64)>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &StatusView {
        &self.view
    }

    fn update_segment_clock(&mut self, elapsed_ms: u64) {
        let Some((start, end)) = self.segment_span else {
            return;
        };
        self.view.time_left = format_clock(end.saturating_sub(elapsed_ms));

        let duration = end - start;
        self.view.segment_percent = if duration == 0 {
            100
        } else {
            let into = elapsed_ms.clamp(start, end) - start;
            ((into as f64 / duration as f64) * 100.0).round() as u8
        };
    }
}

impl Subscriber for StatusBoard {
    fn handle(&mut self, event: &WorkoutEvent) -> Result<(), SubscriberError> {
        match event {
            WorkoutEvent::Init(info) => {
                if !info.title.is_empty() {
                    self.view.title = info.title.clone();
                }
                if !info.workout_type.is_empty() {
                    self.view.workout_type = info.workout_type.clone();
                }
                self.view.duration_label = match info.duration_min {
                    Some(minutes) => format!("{} min", minutes),
                    None => format!("{} min", (info.total_ms as f64 / 60_000.0).round()),
                };
                self.view.rounds = format!("0 / {}", info.rounds);
                self.view.done = false;
            }
            WorkoutEvent::Meta(meta) => {
                if let Some(equipment) = &meta.equipment {
                    self.view.equipment = equipment.clone();
                }
                self.view.zones = meta.target_zones.join(" • ");
                if let Some(goal) = &meta.goal {
                    self.view.goal = format!("goal: {}", goal);
                }
            }
            WorkoutEvent::Round(round) => {
                self.view.rounds = format!("{} / {}", round.round, round.total_rounds);
            }
            WorkoutEvent::Segment(seg) => {
                self.view.exercise = seg.exercise.clone();
                self.view.intensity_badge = seg
                    .intensity
                    .map(|i| format!("Intensity: {}", i.as_str().to_uppercase()));
                self.segment_span = Some((seg.seg_start_ms, seg.seg_end_ms));
                self.update_segment_clock(seg.seg_start_ms);
                self.view.done = false;
            }
            WorkoutEvent::Tick(progress) => {
                self.update_segment_clock(progress.elapsed_ms);
                self.view.overall_progress = progress.progress;
            }
            WorkoutEvent::Done(_) => {
                self.view.done = true;
                self.view.time_left = format_clock(0);
                self.view.overall_progress = 1.0;
            }
            WorkoutEvent::Cue(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{InitInfo, Progress, RoundInfo, SegmentInfo};
    use crate::workout::{Intensity, Phase, WorkoutMetadata};

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9_200), "00:10");
        assert_eq!(format_clock(40_000), "00:40");
        assert_eq!(format_clock(125_000), "02:05");
        assert_eq!(format_clock(3_600_000), "60:00");
    }

    #[test]
    fn test_defaults_until_meta() {
        let mut board = StatusBoard::new();
        board
            .handle(&WorkoutEvent::Meta(WorkoutMetadata::default()))
            .unwrap();
        assert_eq!(board.view().equipment, "bodyweight");
        assert_eq!(board.view().goal, "goal: general fitness");
    }

    #[test]
    fn test_tracks_segment_and_progress() {
        let mut board = StatusBoard::new();
        board
            .handle(&WorkoutEvent::Init(InitInfo {
                workout_type: "HIIT".to_string(),
                title: "Blast".to_string(),
                duration_min: None,
                total_ms: 120_000,
                rounds: 2,
            }))
            .unwrap();
        assert_eq!(board.view().duration_label, "2 min");

        board
            .handle(&WorkoutEvent::Round(RoundInfo {
                round: 1,
                total_rounds: 2,
            }))
            .unwrap();
        board
            .handle(&WorkoutEvent::Segment(SegmentInfo {
                phase: Phase::Work,
                round: 1,
                index_in_round: 1,
                exercise: "Burpees".to_string(),
                intensity: Some(Intensity::High),
                seg_start_ms: 0,
                seg_end_ms: 40_000,
                seg_duration_ms: 40_000,
            }))
            .unwrap();
        board
            .handle(&WorkoutEvent::Tick(Progress::at(10_000.0, 120_000)))
            .unwrap();

        let view = board.view();
        assert_eq!(view.rounds, "1 / 2");
        assert_eq!(view.exercise, "Burpees");
        assert_eq!(view.intensity_badge.as_deref(), Some("Intensity: HIGH"));
        assert_eq!(view.time_left, "00:30");
        assert_eq!(view.segment_percent, 25);
        assert!(!view.done);
    }
}
