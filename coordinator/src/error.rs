use thiserror::Error;

use arena::ArenaError;
use common::ids::{MatchId, TournamentId};
use guildwar::GuildWarError;
use matchmaking::MatchmakingError;
use rating::RatingError;
use tournament::TournamentError;
use worldpvp::WorldPvpError;

/// Cross-component errors surfaced at the dispatcher boundary. Individual
/// components keep their own `thiserror` enums; this one only wraps them
/// where a dispatcher call can fail for more than one component's reason.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("matchmaking: {0}")]
    Matchmaking(#[from] MatchmakingError),
    #[error("arena: {0}")]
    Arena(#[from] ArenaError),
    #[error("tournament: {0}")]
    Tournament(#[from] TournamentError),
    #[error("world pvp: {0}")]
    WorldPvp(#[from] WorldPvpError),
    #[error("guild war: {0}")]
    GuildWar(#[from] GuildWarError),
    #[error("rating: {0}")]
    Rating(#[from] RatingError),
    #[error("arena match {0} is not correlated with a tournament")]
    UnknownTournamentMatch(MatchId),
    #[error("tournament {0} has no registered mode")]
    UnknownTournamentMode(TournamentId),
}
