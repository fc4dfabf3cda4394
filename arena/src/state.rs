use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    WaitingForPlayers,
    Countdown,
    InProgress,
    SuddenDeath,
    Finished,
    Abandoned,
}

impl MatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchState::Finished | MatchState::Abandoned)
    }

    /// Valid forward transitions; the state machine never regresses.
    pub fn can_transition_to(self, next: MatchState) -> bool {
        use MatchState::*;
        matches!(
            (self, next),
            (WaitingForPlayers, Countdown)
                | (Countdown, InProgress)
                | (InProgress, SuddenDeath)
                | (InProgress, Finished)
                | (SuddenDeath, Finished)
                | (WaitingForPlayers, Abandoned)
                | (Countdown, Abandoned)
                | (InProgress, Abandoned)
                | (SuddenDeath, Abandoned)
        )
    }
}
