use common::ids::{MatchId, PlayerId};

#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("match {0} not found")]
    UnknownMatch(MatchId),
    #[error("match {0} is in state that does not allow this operation")]
    StateConflict(MatchId),
    #[error("match {0} is already full")]
    MatchFull(MatchId),
    #[error("player {0} is not in match {1}")]
    UnknownPlayer(PlayerId, MatchId),
}
