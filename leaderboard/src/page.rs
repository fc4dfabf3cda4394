use serde::{Deserialize, Serialize};

use crate::row::LeaderboardRow;

pub const PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub category: String,
    pub page: u32,
    pub total_entries: u32,
    pub rows: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, Copy)]
pub struct LeaderboardQuery<'a> {
    pub category: &'a str,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPosition {
    pub rank: u32,
    pub percentile: f64,
    pub neighborhood: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_players: u32,
    pub average_rating: f64,
    pub tier_distribution: Vec<(String, u32)>,
}
