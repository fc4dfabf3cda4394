#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarPhase {
    Declaration,
    Preparation,
    Active,
    Resolution,
    Completed,
    Expired,
}

impl WarPhase {
    pub fn can_transition_to(self, next: WarPhase) -> bool {
        use WarPhase::*;
        matches!(
            (self, next),
            (Declaration, Preparation)
                | (Declaration, Expired)
                | (Preparation, Active)
                | (Active, Resolution)
                | (Resolution, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WarPhase::Completed | WarPhase::Expired)
    }
}
