use common::ids::GuildId;

use crate::config::WarConfig;

/// A capturable point inside a war: a fixed node for instanced wars, or a
/// contested territory for seamless ones. Both share the same capture math.
#[derive(Debug, Clone)]
pub struct Objective {
    pub id: u32,
    pub name: String,
    pub point_value: u32,
    pub controlling_guild: Option<GuildId>,
    pub progress: f32,
}

impl Objective {
    pub fn new(id: u32, name: impl Into<String>, point_value: u32) -> Self {
        Self {
            id,
            name: name.into(),
            point_value,
            controlling_guild: None,
            progress: 0.0,
        }
    }

    /// Accrues capture progress toward whichever guild holds a strict
    /// headcount majority on site this tick. Returns the new controller if
    /// control flipped. Ties or sub-minimum presence make no progress.
    pub fn apply_capture_tick(
        &mut self,
        guild_a: GuildId,
        count_a: u32,
        guild_b: GuildId,
        count_b: u32,
        config: &WarConfig,
        dt: std::time::Duration,
    ) -> Option<GuildId> {
        let total = count_a + count_b;
        if total < config.min_players_to_capture || count_a == count_b {
            return None;
        }
        let (dominant, count) = if count_a > count_b { (guild_a, count_a) } else { (guild_b, count_b) };
        if Some(dominant) == self.controlling_guild {
            self.progress = 0.0;
            return None;
        }
        let delta = config.capture_rate * count as f32 * dt.as_secs_f32();
        self.progress = (self.progress + delta).min(config.capture_threshold);
        if self.progress >= config.capture_threshold {
            self.controlling_guild = Some(dominant);
            self.progress = 0.0;
            return Some(dominant);
        }
        None
    }

    /// Releases this objective's territory claim, resetting it to neutral.
    pub fn release_claim(&mut self) {
        self.controlling_guild = None;
        self.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> WarConfig {
        let mut c = WarConfig::instanced();
        c.capture_rate = 1000.0;
        c
    }

    #[test]
    fn dominant_presence_eventually_captures() {
        let mut obj = Objective::new(1, "north-gate", 50);
        let a = GuildId(1);
        let b = GuildId(2);
        let cfg = config();
        let captured = obj.apply_capture_tick(a, 3, b, 0, &cfg, Duration::from_millis(200));
        assert_eq!(captured, Some(a));
        assert_eq!(obj.controlling_guild, Some(a));
    }

    #[test]
    fn tied_presence_makes_no_progress() {
        let mut obj = Objective::new(1, "north-gate", 50);
        let cfg = config();
        let captured = obj.apply_capture_tick(GuildId(1), 2, GuildId(2), 2, &cfg, Duration::from_secs(5));
        assert_eq!(captured, None);
        assert_eq!(obj.progress, 0.0);
    }
}
