//! Randomized structural checks on compiled timelines
//!
//! Seeded so failures are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use workout_player::workout::{BlockItem, CooldownItem};
use workout_player::{Intensity, Phase, WorkoutDescription, compile};

const CASES: usize = 500;

fn random_workout(rng: &mut StdRng) -> WorkoutDescription {
    let labels = ["Burpees", "Rest", "Squats", "rest", "Plank", "Lunges"];
    let intensities = [None, Some(Intensity::Low), Some(Intensity::Medium), Some(Intensity::High)];

    let block = (0..rng.gen_range(0..8))
        .map(|_| {
            let label = labels[rng.gen_range(0..labels.len())];
            let seconds = if rng.gen_bool(0.1) {
                -rng.gen_range(0.0..10.0)
            } else {
                rng.gen_range(0.0..90.0)
            };
            BlockItem::new(label, seconds, intensities[rng.gen_range(0..intensities.len())])
        })
        .collect();

    let cooldown = (0..rng.gen_range(0..3))
        .map(|i| CooldownItem::new(&format!("Stretch {}", i), rng.gen_range(0.0..60.0)))
        .collect();

    WorkoutDescription::new("Random", rng.gen_range(-2..6), block, cooldown)
}

#[test]
fn test_segments_partition_the_timeline() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..CASES {
        let workout = random_workout(&mut rng);
        let timeline = compile(&workout);
        let segments = timeline.segments();

        if let (Some(first), Some(last)) = (segments.first(), segments.last()) {
            assert_eq!(first.start_ms, 0);
            assert_eq!(last.end_ms, timeline.total_ms());
        } else {
            assert_eq!(timeline.total_ms(), 0);
        }

        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
        for seg in segments {
            assert!(seg.end_ms >= seg.start_ms);
        }
    }
}

#[test]
fn test_round_numbers() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..CASES {
        let workout = random_workout(&mut rng);
        let rounds = workout.round_count();
        let timeline = compile(&workout);

        let exercise_rounds: Vec<u32> = timeline
            .segments()
            .iter()
            .filter(|s| s.phase != Phase::Cooldown)
            .map(|s| s.round)
            .collect();
        assert!(exercise_rounds.windows(2).all(|w| w[0] <= w[1]));
        assert!(exercise_rounds.iter().all(|&r| (1..=rounds).contains(&r)));

        for seg in timeline.segments().iter().filter(|s| s.phase == Phase::Cooldown) {
            assert_eq!(seg.round, rounds + 1);
            assert_eq!(seg.intensity, Some(Intensity::Low));
        }
    }
}

#[test]
fn test_lookup_finds_containing_segment() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..CASES {
        let timeline = compile(&random_workout(&mut rng));
        let total = timeline.total_ms();

        if total == 0 {
            assert_eq!(timeline.segment_at(0), None);
            continue;
        }

        for _ in 0..20 {
            let ms = rng.gen_range(0..total);
            let index = timeline.segment_at(ms).expect("every instant is covered");
            let seg = &timeline.segments()[index];
            assert!(seg.start_ms <= ms && ms < seg.end_ms);
        }
        assert_eq!(timeline.segment_at(total), None);
    }
}
