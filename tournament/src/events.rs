use common::ids::{PlayerId, TournamentId};

#[derive(Debug, Clone)]
pub enum TournamentEvent {
    Registered {
        tournament: TournamentId,
        player: PlayerId,
    },
    CheckedIn {
        tournament: TournamentId,
        player: PlayerId,
    },
    BracketGenerated {
        tournament: TournamentId,
        participants: usize,
    },
    MatchReady {
        tournament: TournamentId,
        player_a: PlayerId,
        player_b: PlayerId,
    },
    RoundAdvanced {
        tournament: TournamentId,
        round: u32,
    },
    Completed {
        tournament: TournamentId,
        champion: Option<PlayerId>,
        prize_pool: Vec<(PlayerId, u64)>,
    },
    Cancelled {
        tournament: TournamentId,
    },
}
