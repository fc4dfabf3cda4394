use common::ids::{GuildId, PlayerId, WarId};

#[derive(Debug, Clone)]
pub enum GuildWarEvent {
    WarDeclared { war: WarId, guild_a: GuildId, guild_b: GuildId },
    WarAccepted { war: WarId },
    WarExpired { war: WarId },
    WarStarted { war: WarId },
    ObjectiveCaptured { war: WarId, objective: u32, controller: GuildId },
    WarEnded { war: WarId, winner: Option<GuildId>, score_a: u32, score_b: u32 },
    ParticipantJoined { war: WarId, player: PlayerId, guild: GuildId },
}
