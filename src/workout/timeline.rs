// Timeline - Compiled, flat representation of a workout
// Rounds are unrolled into contiguous segments on a single millisecond axis

use super::description::{Intensity, WorkoutDescription};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
    Cooldown,
}

impl Phase {
    /// Classify a block item by its label
    pub fn classify(label: &str) -> Self {
        if label.eq_ignore_ascii_case("rest") {
            Phase::Rest
        } else {
            Phase::Work
        }
    }

    /// Whether countdown cues are emitted during this phase
    pub fn has_cues(&self) -> bool {
        matches!(self, Phase::Work | Phase::Cooldown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
            Phase::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled interval `[start_ms, end_ms)` of the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub phase: Phase,
    /// Round number (1-based); cooldown uses rounds + 1
    pub round: u32,
    /// Position within the round (1-based)
    pub index_in_round: u32,
    pub label: String,
    pub intensity: Option<Intensity>,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Segment {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    pub fn contains(&self, ms: u64) -> bool {
        ms >= self.start_ms && ms < self.end_ms
    }
}

/// Immutable compiled workout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    total_ms: u64,
    segments: Vec<Segment>,
}

impl Timeline {
    /// Total playable length in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.total_ms == 0
    }

    /// Index of the segment containing `ms`
    ///
    /// Binary search over the sorted partition. Zero-length segments are never
    /// returned and `ms >= total_ms` yields None.
    pub fn segment_at(&self, ms: u64) -> Option<usize> {
        let index = self.segments.partition_point(|seg| seg.end_ms <= ms);
        self.segments
            .get(index)
            .filter(|seg| seg.contains(ms))
            .map(|_| index)
    }

    /// Cursor-based builder, keeps the partition contiguous
    /// Saturates at `u64::MAX` so the segments stay ordered on absurd input
    fn push(
        &mut self,
        phase: Phase,
        round: u32,
        index_in_round: u32,
        label: &str,
        intensity: Option<Intensity>,
        duration_ms: u64,
    ) {
        let start_ms = self.total_ms;
        let end_ms = start_ms.saturating_add(duration_ms);
        self.segments.push(Segment {
            phase,
            round,
            index_in_round,
            label: label.to_string(),
            intensity,
            start_ms,
            end_ms,
        });
        self.total_ms = end_ms;
    }
}

/// Compile a workout description into a timeline
///
/// The block is repeated for `round_count()` rounds (at most `MAX_ROUNDS`),
/// then the cooldown list is appended as round `rounds + 1`. Malformed
/// durations are already clamped by the description, so this never fails.
pub fn compile(workout: &WorkoutDescription) -> Timeline {
    let rounds = workout.round_count();
    let block = workout.block();
    let mut timeline = Timeline::default();

    for round in 1..=rounds {
        for (i, item) in block.iter().enumerate() {
            timeline.push(
                Phase::classify(&item.exercise),
                round,
                i as u32 + 1,
                &item.exercise,
                item.intensity,
                item.duration_ms(),
            );
        }
    }

    let cooldown_round = rounds.saturating_add(1);
    for (i, item) in workout.cooldown.iter().enumerate() {
        timeline.push(
            Phase::Cooldown,
            cooldown_round,
            i as u32 + 1,
            &item.exercise,
            Some(Intensity::Low),
            item.duration_ms(),
        );
    }

    log::debug!(
        "Compiled '{}': {} segments, {} ms",
        workout.title,
        timeline.len(),
        timeline.total_ms()
    );
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::description::{BlockItem, CooldownItem};

    fn burpees_and_rest() -> WorkoutDescription {
        WorkoutDescription::new(
            "Test",
            1,
            vec![
                BlockItem::new("Burpees", 30.0, Some(Intensity::High)),
                BlockItem::new("Rest", 30.0, Some(Intensity::Low)),
            ],
            vec![],
        )
    }

    #[test]
    fn test_phase_classification() {
        assert_eq!(Phase::classify("Rest"), Phase::Rest);
        assert_eq!(Phase::classify("REST"), Phase::Rest);
        assert_eq!(Phase::classify("Rest stop"), Phase::Work);
        assert_eq!(Phase::classify("Burpees"), Phase::Work);
        assert!(Phase::Work.has_cues());
        assert!(Phase::Cooldown.has_cues());
        assert!(!Phase::Rest.has_cues());
    }

    #[test]
    fn test_compile_single_round() {
        let timeline = compile(&burpees_and_rest());

        assert_eq!(timeline.total_ms(), 60_000);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.segment_at(29_999), Some(0));
        assert_eq!(timeline.segment_at(30_000), Some(1));
        assert_eq!(timeline.segment_at(60_000), None);
        assert_eq!(timeline.get(1).unwrap().phase, Phase::Rest);
    }

    #[test]
    fn test_compile_rounds_and_cooldown() {
        let workout = WorkoutDescription::sample().unwrap();
        let timeline = compile(&workout);

        // 2 rounds * (3 * 40s + 3 * 20s) + 2 * 30s cooldown
        assert_eq!(timeline.total_ms(), 2 * 180_000 + 60_000);
        assert_eq!(timeline.len(), 14);

        let cooldown: Vec<_> = timeline
            .segments()
            .iter()
            .filter(|s| s.phase == Phase::Cooldown)
            .collect();
        assert_eq!(cooldown.len(), 2);
        assert!(cooldown.iter().all(|s| s.round == 3));
        assert!(cooldown.iter().all(|s| s.intensity == Some(Intensity::Low)));
        assert_eq!(cooldown[1].index_in_round, 2);

        let second_round_first = &timeline.segments()[6];
        assert_eq!(second_round_first.round, 2);
        assert_eq!(second_round_first.index_in_round, 1);
        assert_eq!(second_round_first.start_ms, 180_000);
    }

    #[test]
    fn test_compile_empty() {
        let timeline = compile(&WorkoutDescription::default());

        assert!(timeline.is_empty());
        assert_eq!(timeline.len(), 0);
        assert_eq!(timeline.segment_at(0), None);
    }

    #[test]
    fn test_cooldown_only() {
        let workout = WorkoutDescription::new(
            "Stretch",
            4,
            vec![],
            vec![CooldownItem::new("Hamstrings", 10.0)],
        );
        let timeline = compile(&workout);

        assert_eq!(timeline.total_ms(), 10_000);
        assert_eq!(timeline.get(0).unwrap().round, 5);
    }

    #[test]
    fn test_zero_length_segments_are_skipped_by_lookup() {
        let workout = WorkoutDescription::new(
            "Gaps",
            1,
            vec![
                BlockItem::new("A", 10.0, None),
                BlockItem::new("Skipped", 0.0, None),
                BlockItem::new("B", 10.0, None),
            ],
            vec![],
        );
        let timeline = compile(&workout);

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.get(1).unwrap().duration_ms(), 0);
        assert_eq!(timeline.segment_at(9_999), Some(0));
        assert_eq!(timeline.segment_at(10_000), Some(2));
    }

    #[test]
    fn test_push_saturates_instead_of_wrapping() {
        let mut timeline = Timeline::default();
        timeline.push(Phase::Work, 1, 1, "A", None, u64::MAX / 2 + 1);
        timeline.push(Phase::Work, 1, 2, "B", None, u64::MAX / 2 + 1);
        timeline.push(Phase::Work, 1, 3, "C", None, 10);

        assert_eq!(timeline.total_ms(), u64::MAX);
        for pair in timeline.segments().windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
            assert!(pair[0].start_ms <= pair[1].start_ms);
        }
        assert_eq!(timeline.segment_at(u64::MAX / 2 + 5), Some(1));
    }
}
