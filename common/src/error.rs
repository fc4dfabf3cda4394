pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The component tag carried by `CoreError`, used to scope metrics and logs
/// without needing a single monolithic error enum for the whole core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Matchmaking,
    Arena,
    Tournament,
    WorldPvp,
    GuildWar,
    Rating,
    Leaderboard,
    Coordinator,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Component::Matchmaking => "matchmaking",
            Component::Arena => "arena",
            Component::Tournament => "tournament",
            Component::WorldPvp => "worldpvp",
            Component::GuildWar => "guildwar",
            Component::Rating => "rating",
            Component::Leaderboard => "leaderboard",
            Component::Coordinator => "coordinator",
        };
        write!(f, "{s}")
    }
}

/// Composes a component-local error at the dispatcher boundary, tagging it
/// with the component it came from. Components keep their own `thiserror`
/// enums; this wrapper only exists where errors cross component lines.
#[derive(Debug, thiserror::Error)]
#[error("{component}: {source}")]
pub struct CoreError {
    pub component: Component,
    #[source]
    pub source: BoxError,
}

impl CoreError {
    pub fn new(component: Component, source: impl Into<BoxError>) -> Self {
        Self {
            component,
            source: source.into(),
        }
    }
}
