#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("unknown player {0} in mode {1}")]
    UnknownPlayer(common::ids::PlayerId, String),
    #[error("result submission must name at least one winner and one loser")]
    EmptyResult,
    #[error("a player cannot appear on both sides of a result")]
    OverlappingRoster,
}
