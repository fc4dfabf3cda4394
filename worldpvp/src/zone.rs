use std::collections::HashMap;
use std::time::Instant;

use common::ids::{Faction, PlayerId};

use crate::config::{ZoneConfig, ZoneKind};

/// Same-faction fire is always denied; `Neutral` never has a hostile pair.
pub fn is_hostile(a: Faction, b: Faction) -> bool {
    !matches!((a, b), (Faction::Neutral, _) | (_, Faction::Neutral)) && a != b
}

pub struct ZoneState {
    pub config: ZoneConfig,
    pub members: HashMap<PlayerId, Faction>,
    pub controlling_faction: Option<Faction>,
    pub progress: f32,
    pub last_capture_tick: Option<Instant>,
}

impl ZoneState {
    pub fn new(config: ZoneConfig) -> Self {
        Self {
            config,
            members: HashMap::new(),
            controlling_faction: None,
            progress: 0.0,
            last_capture_tick: None,
        }
    }

    pub fn should_capture_tick(&self, now: Instant) -> bool {
        self.last_capture_tick
            .map(|t| now.duration_since(t) >= self.config.capture_tick)
            .unwrap_or(true)
    }

    /// Headcount by faction among the zone's current members.
    fn faction_headcounts(&self) -> HashMap<Faction, u32> {
        let mut counts = HashMap::new();
        for &faction in self.members.values() {
            *counts.entry(faction).or_insert(0) += 1;
        }
        counts
    }

    /// Accrues capture progress toward the dominant faction present, flipping
    /// control when the threshold is crossed. Returns the new controller if
    /// control flipped this tick.
    pub fn apply_capture_tick(&mut self, dt: std::time::Duration) -> Option<Faction> {
        let counts = self.faction_headcounts();
        let Some((&dominant, &count)) = counts.iter().max_by_key(|(_, &c)| c) else {
            return None;
        };
        if counts.values().filter(|&&c| c == count).count() > 1 {
            // contested headcount tie: no net progress this tick.
            return None;
        }
        if Some(dominant) == self.controlling_faction {
            self.progress = 0.0;
            return None;
        }
        let delta = self.config.capture_rate * count as f32 * dt.as_secs_f32();
        self.progress = (self.progress + delta).clamp(-self.config.capture_threshold, self.config.capture_threshold);
        if self.progress >= self.config.capture_threshold {
            self.controlling_faction = Some(dominant);
            self.progress = 0.0;
            return Some(dominant);
        }
        None
    }

    pub fn is_free_for_all(&self) -> bool {
        self.config.kind == ZoneKind::FreeForAll
    }
}
