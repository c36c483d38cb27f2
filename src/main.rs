mod cli;

use clap::Parser;
use cli::Args;
use std::cell::RefCell;
use std::rc::Rc;
use workout_player::{
    EventBus, EventLogger, NarrationQueue, PlayerConfig, PlayerResult, SubscriberError,
    WorkoutDescription, WorkoutPlayer,
};

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(&args) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> PlayerResult<()> {
    let workout = match &args.workout {
        Some(path) => WorkoutDescription::from_path(path)?,
        None => WorkoutDescription::sample()?,
    };

    let mut config = match &args.config {
        Some(path) => PlayerConfig::from_path(path)?,
        None => PlayerConfig::default(),
    };
    args.apply(&mut config);

    // Subscribe everything before the player exists: construction publishes init/meta
    let bus = Rc::new(EventBus::new());
    bus.subscribe_all(EventLogger::new());

    let narration = Rc::new(RefCell::new(NarrationQueue::new()));
    bus.subscribe_shared(None, Rc::clone(&narration));
    let coach = Rc::clone(&narration);
    bus.on_any(move |_| {
        for prompt in coach.borrow_mut().drain() {
            log::info!("Coach: {}", prompt.announcement());
        }
        Ok(())
    });

    if args.json {
        bus.on_any(|event| {
            let line = event
                .to_json()
                .map_err(|e| SubscriberError::new(e.to_string()))?;
            println!("{}", line);
            Ok(())
        });
    }

    let mut player = WorkoutPlayer::new(&workout, Rc::clone(&bus), config)?;
    player.start();
    player.run();

    if bus.failure_count() > 0 {
        log::warn!("{} subscriber failures during playback", bus.failure_count());
    }
    Ok(())
}
