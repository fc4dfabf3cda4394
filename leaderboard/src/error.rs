#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("unknown leaderboard category {0}")]
    UnknownCategory(String),
}
