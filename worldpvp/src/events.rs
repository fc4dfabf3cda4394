use common::ids::{Faction, PlayerId, ZoneId};

#[derive(Debug, Clone)]
pub enum WorldPvpEvent {
    PlayerFlagged { player: PlayerId, zone: ZoneId },
    PlayerUnflagged { player: PlayerId },
    ZoneCaptured { zone: ZoneId, new_controller: Faction },
    PlayerKilled { killer: PlayerId, victim: PlayerId, honor: u32 },
}
