use arena::MatchConfig;
use matchmaking::ModeConfig;

/// A competitive mode, as seen by every component that needs to agree on its
/// name: the matchmaking queue that fills it, the arena config it resolves
/// to, and the rating/leaderboard category it feeds.
#[derive(Debug, Clone)]
pub struct ModeDef {
    pub name: String,
    pub queue: ModeConfig,
    pub arena: MatchConfig,
}

impl ModeDef {
    pub fn new(name: impl Into<String>, queue: ModeConfig, arena: MatchConfig) -> Self {
        Self { name: name.into(), queue, arena }
    }

    pub fn arena_1v1() -> Self {
        Self::new("arena_1v1", ModeConfig::arena_1v1(), MatchConfig::arena_1v1())
    }

    pub fn arena_3v3() -> Self {
        Self::new("arena_3v3", ModeConfig::arena_3v3(), MatchConfig::arena_3v3())
    }
}
