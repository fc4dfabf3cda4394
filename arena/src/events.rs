use common::ids::{MatchId, PlayerId};

use crate::stats::MvpReason;

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub winner: Option<u8>,
    pub teams: Vec<Vec<PlayerId>>,
    pub mvp: Option<(PlayerId, MvpReason)>,
    pub is_draw: bool,
}

#[derive(Debug, Clone)]
pub enum ArenaEvent {
    MatchStarted { match_id: MatchId },
    SuddenDeathStarted { match_id: MatchId },
    MatchFinished(MatchResult),
    MatchAbandoned { match_id: MatchId },
}
