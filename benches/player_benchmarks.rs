use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::rc::Rc;
use workout_player::messaging::Progress;
use workout_player::workout::BlockItem;
use workout_player::{
    EventBus, Intensity, ManualTime, PlayerConfig, WorkoutDescription, WorkoutEvent,
    WorkoutPlayer, compile,
};

fn long_workout(rounds: i64) -> WorkoutDescription {
    let block = (0..10)
        .map(|i| {
            if i % 2 == 0 {
                BlockItem::new(&format!("Exercise {}", i), 40.0, Some(Intensity::High))
            } else {
                BlockItem::new("Rest", 20.0, Some(Intensity::Low))
            }
        })
        .collect();
    WorkoutDescription::new("Bench", rounds, block, vec![])
}

/// Benchmark timeline compilation
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for rounds in [1, 10, 100] {
        let workout = long_workout(rounds);
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &workout, |b, w| {
            b.iter(|| black_box(compile(w)));
        });
    }
    group.finish();
}

/// Benchmark segment lookup (runs on every tick)
fn bench_segment_lookup(c: &mut Criterion) {
    let timeline = compile(&long_workout(100));
    let total = timeline.total_ms();

    c.bench_function("segment_at", |b| {
        let mut ms = 0;
        b.iter(|| {
            ms = (ms + 7_919) % total;
            black_box(timeline.segment_at(ms))
        });
    });
}

/// Benchmark one full tick with subscribers attached
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for subscribers in [0, 4, 16] {
        let time = ManualTime::new();
        let bus = Rc::new(EventBus::new());
        for _ in 0..subscribers {
            bus.on_any(|event| {
                black_box(event.kind());
                Ok(())
            });
        }

        let config = PlayerConfig {
            loop_enabled: true,
            ..Default::default()
        };
        let mut player = WorkoutPlayer::with_time_source(
            &long_workout(10),
            bus,
            config,
            Rc::new(time.clone()),
        )
        .unwrap();
        player.start();

        group.bench_function(BenchmarkId::from_parameter(subscribers), |b| {
            b.iter(|| {
                time.advance(200.0);
                player.tick();
            });
        });
    }
    group.finish();
}

/// Benchmark JSON event output (the CLI's --json mode)
fn bench_event_json(c: &mut Criterion) {
    let event = WorkoutEvent::Tick(Progress::at(123_456.0, 420_000));
    c.bench_function("event_to_json", |b| {
        b.iter(|| black_box(event.to_json()));
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_segment_lookup,
    bench_tick,
    bench_event_json
);
criterion_main!(benches);
