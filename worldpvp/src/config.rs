use std::time::Duration;

use common::ids::ZoneId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: (f32, f32, f32),
    pub max: (f32, f32, f32),
}

impl Aabb {
    pub fn contains(&self, pos: (f32, f32, f32)) -> bool {
        pos.0 >= self.min.0
            && pos.0 <= self.max.0
            && pos.1 >= self.min.1
            && pos.1 <= self.max.1
            && pos.2 >= self.min.2
            && pos.2 <= self.max.2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    /// Standard faction-vs-faction contest; same-faction attacks are denied.
    Contested,
    /// Anyone flagged can attack anyone else flagged, faction notwithstanding.
    FreeForAll,
}

#[derive(Debug, Clone)]
pub struct ZoneConfig {
    pub id: ZoneId,
    pub name: String,
    pub aabb: Aabb,
    pub kind: ZoneKind,
    pub capture_rate: f32,
    pub capture_threshold: f32,
    pub capture_tick: Duration,
}

impl ZoneConfig {
    pub fn contested(id: ZoneId, name: impl Into<String>, aabb: Aabb) -> Self {
        Self {
            id,
            name: name.into(),
            aabb,
            kind: ZoneKind::Contested,
            capture_rate: 2.0,
            capture_threshold: 100.0,
            capture_tick: Duration::from_secs(5),
        }
    }

    pub fn free_for_all(id: ZoneId, name: impl Into<String>, aabb: Aabb) -> Self {
        Self {
            kind: ZoneKind::FreeForAll,
            ..Self::contested(id, name, aabb)
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorldPvpConfig {
    pub flag_expiry: Duration,
    pub honor_base: u32,
    pub honor_window: Duration,
    /// How often player positions are re-bucketed into zones; membership
    /// does not need to track movement every tick.
    pub membership_refresh: Duration,
}

impl Default for WorldPvpConfig {
    fn default() -> Self {
        Self {
            flag_expiry: Duration::from_secs(5 * 60),
            honor_base: 10,
            honor_window: Duration::from_secs(60 * 60),
            membership_refresh: Duration::from_secs(2),
        }
    }
}
