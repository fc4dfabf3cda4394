use common::ids::PlayerId;
use rating::Tier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub previous_rank: Option<u32>,
    pub player: PlayerId,
    pub rating: i32,
    pub tier: Tier,
    pub wins: u32,
    pub losses: u32,
    pub matches: u32,
    pub streak: i32,
}

impl LeaderboardRow {
    pub fn rank_change(&self) -> i64 {
        match self.previous_rank {
            Some(prev) => prev as i64 - self.rank as i64,
            None => 0,
        }
    }
}

/// Ordering used to sort rows within a category: rating desc, wins desc,
/// matches asc, player id asc (fully deterministic tie-break).
pub fn row_cmp(a: &LeaderboardRow, b: &LeaderboardRow) -> std::cmp::Ordering {
    b.rating
        .cmp(&a.rating)
        .then(b.wins.cmp(&a.wins))
        .then(a.matches.cmp(&b.matches))
        .then(a.player.cmp(&b.player))
}
