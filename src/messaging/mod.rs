// Messaging - Domain events and the bus that carries them to subscribers

pub mod bus;
pub mod event;

pub use bus::{EventBus, Subscriber, SubscriberError, SubscriptionId};
pub use event::{
    CueInfo, DoneInfo, EventKind, InitInfo, Progress, RoundInfo, SegmentInfo, UnknownEventKind,
    WorkoutEvent,
};
