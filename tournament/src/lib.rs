pub mod bracket;
pub mod engine;
pub mod error;
pub mod events;
pub mod format;
pub mod match_slot;
pub mod seeding;
pub mod state;

pub use bracket::{Bracket, BracketGraph};
pub use engine::{PrizeDistribution, Tournament, TournamentConfig, TournamentEngine};
pub use error::TournamentError;
pub use events::TournamentEvent;
pub use format::TournamentFormat;
pub use match_slot::{BracketMatch, BracketSide, FeedKind, Slot, SlotState};
pub use state::TournamentState;
