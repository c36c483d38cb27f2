// Narration - Coach prompt requests for an external voice/text backend
// The backend is not part of this crate; prompts are queued and drained by the host

use crate::messaging::{Subscriber, SubscriberError, WorkoutEvent};
use crate::workout::{Intensity, Phase};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptKind {
    NextExercise,
    Rest,
    Cooldown,
    RoundStart,
    WorkoutComplete,
}

/// One request to the narration backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachPrompt {
    #[serde(rename = "type")]
    pub kind: PromptKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rounds: Option<u32>,
}

impl CoachPrompt {
    fn bare(kind: PromptKind) -> Self {
        Self {
            kind,
            exercise: None,
            duration_sec: None,
            intensity: None,
            round: None,
            total_rounds: None,
        }
    }

    /// Plain-text line to speak when no backend is available
    pub fn announcement(&self) -> String {
        let exercise = self.exercise.as_deref().unwrap_or("the next exercise");
        let seconds = self.duration_sec.unwrap_or(0);

        match self.kind {
            PromptKind::NextExercise => match self.intensity {
                Some(intensity) => format!(
                    "Next up: {} for {} seconds, {} intensity.",
                    exercise, seconds, intensity
                ),
                None => format!("Next up: {} for {} seconds.", exercise, seconds),
            },
            PromptKind::Rest => format!("Rest for {} seconds.", seconds),
            PromptKind::Cooldown => format!("Cool down: {} for {} seconds.", exercise, seconds),
            PromptKind::RoundStart => match (self.round, self.total_rounds) {
                (Some(round), Some(total)) => format!("Round {} of {}.", round, total),
                (Some(round), None) => format!("Round {}.", round),
                _ => "New round.".to_string(),
            },
            PromptKind::WorkoutComplete => "Workout complete. Great job!".to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Queues a `CoachPrompt` for every segment change, round start and completion
#[derive(Debug)]
pub struct NarrationQueue {
    pending: VecDeque<CoachPrompt>,
    announce_rounds: bool,
}

impl Default for NarrationQueue {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            announce_rounds: true,
        }
    }
}

impl NarrationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip ROUND_START prompts
    pub fn without_round_prompts(mut self) -> Self {
        self.announce_rounds = false;
        self
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pop(&mut self) -> Option<CoachPrompt> {
        self.pending.pop_front()
    }

    /// Take every pending prompt, oldest first
    pub fn drain(&mut self) -> Vec<CoachPrompt> {
        self.pending.drain(..).collect()
    }
}

impl Subscriber for NarrationQueue {
    fn handle(&mut self, event: &WorkoutEvent) -> Result<(), SubscriberError> {
        let prompt = match event {
            WorkoutEvent::Segment(seg) => {
                let kind = match seg.phase {
                    Phase::Work => PromptKind::NextExercise,
                    Phase::Rest => PromptKind::Rest,
                    Phase::Cooldown => PromptKind::Cooldown,
                };
                CoachPrompt {
                    exercise: Some(seg.exercise.clone()),
                    duration_sec: Some((seg.seg_duration_ms as f64 / 1000.0).round() as u64),
                    intensity: seg.intensity,
                    ..CoachPrompt::bare(kind)
                }
            }
            WorkoutEvent::Round(round) if self.announce_rounds => CoachPrompt {
                round: Some(round.round),
                total_rounds: Some(round.total_rounds),
                ..CoachPrompt::bare(PromptKind::RoundStart)
            },
            WorkoutEvent::Done(_) => CoachPrompt::bare(PromptKind::WorkoutComplete),
            _ => return Ok(()),
        };

        log::debug!("Queued {:?} prompt", prompt.kind);
        self.pending.push_back(prompt);
        Ok(())
    }
}
