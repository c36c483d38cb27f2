// Workout Player - Library exports for the CLI, tests and benchmarks

pub mod adapters;
pub mod messaging;
pub mod playback;
pub mod workout;

// Re-export commonly used types for convenience
pub use adapters::{CoachPrompt, EventLogger, NarrationQueue, PromptKind, StatusBoard, StatusView};
pub use messaging::{EventBus, EventKind, Subscriber, SubscriberError, SubscriptionId, WorkoutEvent};
pub use playback::{
    ManualTime, MonotonicTime, PlayerConfig, PlayerError, PlayerResult, PlayerState,
    SpeedLimits, TimeSource, WorkoutPlayer,
};
pub use workout::{Intensity, Phase, Segment, Timeline, WorkoutDescription, compile};
