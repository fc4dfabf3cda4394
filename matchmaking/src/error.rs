use common::ids::PlayerId;

#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    #[error("player {0} is already queued")]
    AlreadyQueued(PlayerId),
    #[error("player {0} is not in any queue")]
    NotQueued(PlayerId),
    #[error("unknown matchmaking mode {0}")]
    UnknownMode(String),
    #[error("player {0} is not eligible for mode {1}: {2}")]
    Ineligible(PlayerId, String, &'static str),
}
