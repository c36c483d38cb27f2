// Event logger - Writes every workout event through the `log` facade

use crate::messaging::{Subscriber, SubscriberError, WorkoutEvent};

/// Logs lifecycle, round, segment and cue events at `info`, ticks at `trace`
#[derive(Debug, Default)]
pub struct EventLogger {
    events_seen: u64,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }
}

impl Subscriber for EventLogger {
    fn handle(&mut self, event: &WorkoutEvent) -> Result<(), SubscriberError> {
        self.events_seen += 1;

        match event {
            WorkoutEvent::Init(info) => log::info!(
                "[init] {} '{}': {} rounds, {} ms",
                info.workout_type,
                info.title,
                info.rounds,
                info.total_ms
            ),
            WorkoutEvent::Meta(meta) => log::info!(
                "[meta] equipment={} zones=[{}] goal={}",
                meta.equipment.as_deref().unwrap_or("-"),
                meta.target_zones.join(", "),
                meta.goal.as_deref().unwrap_or("-")
            ),
            WorkoutEvent::Round(round) => {
                log::info!("[round] {} / {}", round.round, round.total_rounds)
            }
            WorkoutEvent::Segment(seg) => log::info!(
                "[segment] {} '{}' round {} #{} ({} ms, intensity {})",
                seg.phase,
                seg.exercise,
                seg.round,
                seg.index_in_round,
                seg.seg_duration_ms,
                seg.intensity.map_or("-", |i| i.as_str())
            ),
            WorkoutEvent::Cue(cue) => log::info!("[cue] {}: {}", cue.exercise, cue.label),
            WorkoutEvent::Tick(p) => log::trace!(
                "[tick] {} ms elapsed, {} ms left ({:.1}%)",
                p.elapsed_ms,
                p.remaining_ms,
                p.progress * 100.0
            ),
            WorkoutEvent::Done(done) => log::info!("[done] '{}'", done.title),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{DoneInfo, Progress};

    #[test]
    fn test_logger_never_fails() {
        let mut logger = EventLogger::new();
        assert!(logger.handle(&WorkoutEvent::Tick(Progress::at(0.0, 0))).is_ok());
        assert!(
            logger
                .handle(&WorkoutEvent::Done(DoneInfo {
                    title: "Test".to_string()
                }))
                .is_ok()
        );
        assert_eq!(logger.events_seen(), 2);
    }
}
