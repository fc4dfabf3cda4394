use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub mode: String,
    pub map: String,
    pub team_size: u32,
    pub score_limit: u32,
    pub time_limit: Duration,
    pub respawn_seconds: Duration,
    pub countdown: Duration,
    pub sudden_death_enabled: bool,
    /// Elapsed time into `InProgress` after which sudden death begins if the
    /// match is still unresolved. Default matches the reference arena's
    /// 8-minute trigger.
    pub sudden_death_after: Duration,
    pub abandon_grace: Duration,
}

impl MatchConfig {
    pub fn arena_1v1() -> Self {
        Self {
            mode: "arena_1v1".into(),
            map: "proving_grounds".into(),
            team_size: 1,
            score_limit: 3,
            time_limit: Duration::from_secs(600),
            respawn_seconds: Duration::from_secs(5),
            countdown: Duration::from_secs(10),
            sudden_death_enabled: true,
            sudden_death_after: Duration::from_secs(480),
            abandon_grace: Duration::from_secs(60),
        }
    }

    pub fn arena_3v3() -> Self {
        Self {
            mode: "arena_3v3".into(),
            map: "blackrock_gauntlet".into(),
            team_size: 3,
            score_limit: 1000,
            time_limit: Duration::from_secs(600),
            respawn_seconds: Duration::from_secs(8),
            countdown: Duration::from_secs(15),
            sudden_death_enabled: true,
            sudden_death_after: Duration::from_secs(480),
            abandon_grace: Duration::from_secs(90),
        }
    }
}
