// Adapters - Ready-made subscribers for logging, display and narration

pub mod logger;
pub mod narration;
pub mod status_board;

pub use logger::EventLogger;
pub use narration::{CoachPrompt, NarrationQueue, PromptKind};
pub use status_board::{StatusBoard, StatusView, format_clock};
