use thiserror::Error;

use common::ids::{GuildId, PlayerId, WarId};

#[derive(Debug, Error)]
pub enum GuildWarError {
    #[error("unknown war {0}")]
    UnknownWar(WarId),
    #[error("guild {0} already has the maximum number of concurrent wars")]
    WarSlotsExhausted(GuildId),
    #[error("guild {0} is not a participant in this war")]
    NotParticipant(GuildId),
    #[error("war {0} is not awaiting a declaration response")]
    NotAwaitingResponse(WarId),
    #[error("unknown objective {0}")]
    UnknownObjective(u32),
    #[error("player {0} is already participating in another active war")]
    AlreadyInWar(PlayerId),
}
