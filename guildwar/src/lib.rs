pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod objective;
pub mod state;
pub mod war;

pub use config::{WarConfig, WarVariant};
pub use engine::{GuildWarEngine, WarOutcome};
pub use error::GuildWarError;
pub use events::GuildWarEvent;
pub use objective::Objective;
pub use state::WarPhase;
pub use war::War;
