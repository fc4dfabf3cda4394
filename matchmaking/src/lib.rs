pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod quality;
pub mod queue;

pub use config::ModeConfig;
pub use engine::{Matchmaker, QueueStatus};
pub use error::MatchmakingError;
pub use events::MatchmakingEvent;
