use thiserror::Error;

use common::ids::{PlayerId, ZoneId};

#[derive(Debug, Error)]
pub enum WorldPvpError {
    #[error("unknown zone {0}")]
    UnknownZone(ZoneId),
    #[error("zone {0} already registered")]
    ZoneAlreadyRegistered(ZoneId),
    #[error("player {0} has no faction set")]
    NoFaction(PlayerId),
}
