use chrono::{DateTime, Utc};
use common::ids::PlayerId;

use crate::tier::Tier;

#[derive(Debug, Clone)]
pub enum RatingEvent {
    ResultSubmitted {
        mode: String,
        player: PlayerId,
        delta: i32,
        new_rating: i32,
        at: DateTime<Utc>,
    },
    TierChanged {
        mode: String,
        player: PlayerId,
        old_tier: Tier,
        new_tier: Tier,
    },
    DecayApplied {
        mode: String,
        player: PlayerId,
        amount: i32,
        new_rating: i32,
    },
    SeasonStarted {
        season: u32,
        at: DateTime<Utc>,
    },
}
