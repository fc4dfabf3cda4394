use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarVariant {
    /// Bounded arena-like instance; participants are teleported in and out.
    Instanced,
    /// Plays out inside normal world zones among contested territories.
    Seamless,
}

#[derive(Debug, Clone)]
pub struct WarConfig {
    pub variant: WarVariant,
    pub declaration_window: Duration,
    pub preparation_window: Duration,
    pub active_duration: Duration,
    pub resolution_window: Duration,

    pub points_per_kill: u32,
    pub points_per_objective: u32,
    pub points_per_territory_minute: u32,
    pub score_cap: u32,

    pub capture_rate: f32,
    pub capture_threshold: f32,
    pub min_players_to_capture: u32,

    pub max_concurrent_wars: u32,
}

impl WarConfig {
    pub fn instanced() -> Self {
        Self {
            variant: WarVariant::Instanced,
            declaration_window: Duration::from_secs(24 * 3600),
            preparation_window: Duration::from_secs(3600),
            active_duration: Duration::from_secs(2 * 3600),
            resolution_window: Duration::from_secs(600),
            points_per_kill: 1,
            points_per_objective: 50,
            points_per_territory_minute: 0,
            score_cap: 500,
            capture_rate: 1.0,
            capture_threshold: 100.0,
            min_players_to_capture: 1,
            max_concurrent_wars: 3,
        }
    }

    pub fn seamless() -> Self {
        Self {
            variant: WarVariant::Seamless,
            declaration_window: Duration::from_secs(24 * 3600),
            preparation_window: Duration::from_secs(3600),
            active_duration: Duration::from_secs(3 * 3600),
            resolution_window: Duration::from_secs(3600),
            points_per_kill: 1,
            points_per_objective: 0,
            points_per_territory_minute: 10,
            score_cap: 1000,
            capture_rate: 1.0,
            capture_threshold: 100.0,
            min_players_to_capture: 5,
            max_concurrent_wars: 3,
        }
    }
}
