use thiserror::Error;

use common::ids::TournamentId;

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("unknown tournament {0}")]
    UnknownTournament(TournamentId),
    #[error("registration is closed for this tournament")]
    RegistrationClosed,
    #[error("participant already registered")]
    AlreadyRegistered,
    #[error("participant is not registered")]
    NotRegistered,
    #[error("not enough checked-in participants to start")]
    InsufficientParticipants,
    #[error("tournament is not in the expected state for this operation")]
    StateConflict,
    #[error("unknown bracket match")]
    UnknownMatch,
}
