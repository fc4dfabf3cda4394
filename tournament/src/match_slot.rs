use common::ids::{MatchId, PlayerId};
use petgraph::graph::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSide {
    Winners,
    Losers,
    GrandFinal,
}

/// What occupies one side of a bracket match before it's been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Bye,
    Participant(PlayerId),
    /// Waiting on the winner (or loser, in the losers bracket) of another match.
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Waiting,
    Ready,
    InProgress,
    Completed,
}

#[derive(Debug, Clone)]
pub struct BracketMatch {
    pub round: u32,
    pub side: BracketSide,
    pub position: usize,
    pub slot_a: Slot,
    pub slot_b: Slot,
    pub state: SlotState,
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
    pub arena_match_id: Option<MatchId>,
    /// Which prior match (and which of its outcomes) feeds slot_a/slot_b, once
    /// that match resolves. `None` means the slot was seeded directly.
    pub source_a: Option<(NodeIndex, FeedKind)>,
    pub source_b: Option<(NodeIndex, FeedKind)>,
}

impl BracketMatch {
    pub fn new(round: u32, side: BracketSide, position: usize, slot_a: Slot, slot_b: Slot) -> Self {
        let state = Self::resolve_state(slot_a, slot_b);
        Self {
            round,
            side,
            position,
            slot_a,
            slot_b,
            state,
            winner: None,
            loser: None,
            arena_match_id: None,
            source_a: None,
            source_b: None,
        }
    }

    fn resolve_state(slot_a: Slot, slot_b: Slot) -> SlotState {
        match (slot_a, slot_b) {
            (Slot::Participant(_), Slot::Participant(_)) => SlotState::Ready,
            _ => SlotState::Waiting,
        }
    }

    pub fn refresh_state(&mut self) {
        if self.state == SlotState::Completed || self.state == SlotState::InProgress {
            return;
        }
        self.state = Self::resolve_state(self.slot_a, self.slot_b);
    }

    pub fn is_ready(&self) -> bool {
        self.state == SlotState::Ready
    }

    pub fn participants(&self) -> (Option<PlayerId>, Option<PlayerId>) {
        let a = match self.slot_a {
            Slot::Participant(p) => Some(p),
            _ => None,
        };
        let b = match self.slot_b {
            Slot::Participant(p) => Some(p),
            _ => None,
        };
        (a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Winner,
    Loser,
}
