// Workout module
// Input document model and the timeline compiler

pub mod description;
pub mod timeline;

pub use description::{BlockItem, CooldownItem, Intensity, IntervalGroup, WorkoutDescription, WorkoutMetadata};
pub use timeline::{Phase, Segment, Timeline, compile};
