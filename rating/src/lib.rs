pub mod elo;
pub mod engine;
pub mod error;
pub mod events;
pub mod tier;

pub use engine::{RatingChange, RatingConfig, RatingEngine, RatingRecord, DEFAULT_RATING};
pub use error::RatingError;
pub use events::RatingEvent;
pub use tier::{tier_of, Tier};
