#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentState {
    Registration,
    CheckIn,
    BracketGeneration,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentState {
    pub fn can_transition_to(self, next: Self) -> bool {
        use TournamentState::*;
        matches!(
            (self, next),
            (Registration, CheckIn)
                | (Registration, Cancelled)
                | (CheckIn, BracketGeneration)
                | (CheckIn, Cancelled)
                | (BracketGeneration, InProgress)
                | (InProgress, InProgress)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TournamentState::Completed | TournamentState::Cancelled)
    }
}
