use std::collections::HashMap;
use std::time::Instant;

use common::events::EventBus;
use common::ids::{Faction, PlayerId, ZoneId};

use crate::config::{WorldPvpConfig, ZoneConfig};
use crate::error::WorldPvpError;
use crate::events::WorldPvpEvent;
use crate::honor::HonorLedger;
use crate::zone::{is_hostile, ZoneState};

#[derive(Debug, Clone, Default)]
pub struct PlayerPvpStats {
    pub kills: u32,
    pub deaths: u32,
    pub streak: u32,
    pub honor_total: u64,
}

struct FlagState {
    flagged_at: Instant,
    expires_at: Option<Instant>,
}

pub struct WorldPvpRuntime {
    config: WorldPvpConfig,
    zones: HashMap<ZoneId, ZoneState>,
    zone_order: Vec<ZoneId>,
    factions: HashMap<PlayerId, Faction>,
    positions: HashMap<PlayerId, (f32, f32, f32)>,
    current_zone: HashMap<PlayerId, ZoneId>,
    flags: HashMap<PlayerId, FlagState>,
    honor_ledger: HonorLedger,
    stats: HashMap<PlayerId, PlayerPvpStats>,
    last_membership_refresh: Option<Instant>,
    events: EventBus<WorldPvpEvent>,
}

impl WorldPvpRuntime {
    pub fn new(config: WorldPvpConfig) -> Self {
        Self {
            config,
            zones: HashMap::new(),
            zone_order: Vec::new(),
            factions: HashMap::new(),
            positions: HashMap::new(),
            current_zone: HashMap::new(),
            flags: HashMap::new(),
            honor_ledger: HonorLedger::new(),
            stats: HashMap::new(),
            last_membership_refresh: None,
            events: EventBus::default(),
        }
    }

    pub fn events(&self) -> &EventBus<WorldPvpEvent> {
        &self.events
    }

    pub fn register_zone(&mut self, config: ZoneConfig) -> Result<(), WorldPvpError> {
        if self.zones.contains_key(&config.id) {
            return Err(WorldPvpError::ZoneAlreadyRegistered(config.id));
        }
        self.zone_order.push(config.id);
        self.zones.insert(config.id, ZoneState::new(config));
        Ok(())
    }

    pub fn set_faction(&mut self, player: PlayerId, faction: Faction) {
        self.factions.insert(player, faction);
    }

    pub fn update_position(&mut self, player: PlayerId, pos: (f32, f32, f32)) {
        self.positions.insert(player, pos);
    }

    pub fn stats(&self, player: PlayerId) -> PlayerPvpStats {
        self.stats.get(&player).cloned().unwrap_or_default()
    }

    fn refresh_flag(&mut self, player: PlayerId, now: Instant) -> bool {
        let was_flagged = self.flags.contains_key(&player);
        self.flags.insert(player, FlagState { flagged_at: now, expires_at: None });
        !was_flagged
    }

    /// Reassigns every known player to at most one zone (first registered
    /// match wins), flagging newcomers and starting the grace timer for
    /// anyone who just left every zone.
    fn refresh_memberships(&mut self, now: Instant) -> Vec<WorldPvpEvent> {
        let mut events = Vec::new();
        for zone in self.zones.values_mut() {
            zone.members.clear();
        }

        let players: Vec<PlayerId> = self.positions.keys().copied().collect();
        for player in players {
            let pos = self.positions[&player];
            let zone_id = self
                .zone_order
                .iter()
                .find(|&&id| self.zones[&id].config.aabb.contains(pos))
                .copied();

            match zone_id {
                Some(id) => {
                    let faction = self.factions.get(&player).copied().unwrap_or(Faction::Neutral);
                    self.zones.get_mut(&id).unwrap().members.insert(player, faction);
                    self.current_zone.insert(player, id);
                    if self.refresh_flag(player, now) {
                        events.push(WorldPvpEvent::PlayerFlagged { player, zone: id });
                    } else if let Some(flag) = self.flags.get_mut(&player) {
                        flag.expires_at = None;
                    }
                }
                None => {
                    self.current_zone.remove(&player);
                    if let Some(flag) = self.flags.get_mut(&player) {
                        if flag.expires_at.is_none() {
                            flag.expires_at = Some(now + self.config.flag_expiry);
                        }
                    }
                }
            }
        }
        events
    }

    fn expire_flags(&mut self, now: Instant) -> Vec<WorldPvpEvent> {
        let expired: Vec<PlayerId> = self
            .flags
            .iter()
            .filter(|(_, f)| f.expires_at.map(|t| now >= t).unwrap_or(false))
            .map(|(&p, _)| p)
            .collect();
        for player in &expired {
            self.flags.remove(player);
        }
        expired
            .into_iter()
            .map(|player| WorldPvpEvent::PlayerUnflagged { player })
            .collect()
    }

    pub fn can_attack(&self, a: PlayerId, b: PlayerId) -> bool {
        if a == b {
            return false;
        }
        let (Some(&zone_a), Some(&zone_b)) = (self.current_zone.get(&a), self.current_zone.get(&b)) else {
            return false;
        };
        if zone_a != zone_b {
            return false;
        }
        if !self.flags.contains_key(&a) || !self.flags.contains_key(&b) {
            return false;
        }
        let Some(zone) = self.zones.get(&zone_a) else {
            return false;
        };
        if zone.is_free_for_all() {
            return true;
        }
        let (Some(&fa), Some(&fb)) = (self.factions.get(&a), self.factions.get(&b)) else {
            return false;
        };
        is_hostile(fa, fb)
    }

    pub fn on_player_killed(&mut self, killer: PlayerId, victim: PlayerId, now: Instant) -> WorldPvpEvent {
        let in_enemy_territory = self
            .current_zone
            .get(&killer)
            .and_then(|z| self.zones.get(z))
            .and_then(|z| z.controlling_faction)
            .zip(self.factions.get(&killer).copied())
            .map(|(controller, faction)| is_hostile(controller, faction))
            .unwrap_or(false);

        let honor = self.honor_ledger.record_kill(
            killer,
            victim,
            now,
            self.config.honor_window,
            self.config.honor_base,
            in_enemy_territory,
        );

        let kstats = self.stats.entry(killer).or_default();
        kstats.kills += 1;
        kstats.streak += 1;
        kstats.honor_total += honor as u64;
        let vstats = self.stats.entry(victim).or_default();
        vstats.deaths += 1;
        vstats.streak = 0;

        self.refresh_flag(killer, now);
        self.refresh_flag(victim, now);

        let event = WorldPvpEvent::PlayerKilled { killer, victim, honor };
        self.events.publish(event.clone());
        event
    }

    pub fn tick(&mut self, now: Instant) -> Vec<WorldPvpEvent> {
        let mut events = Vec::new();

        let due = self
            .last_membership_refresh
            .map(|t| now.duration_since(t) >= self.config.membership_refresh)
            .unwrap_or(true);
        if due {
            self.last_membership_refresh = Some(now);
            events.extend(self.refresh_memberships(now));
        }

        events.extend(self.expire_flags(now));

        let zone_ids = self.zone_order.clone();
        for id in zone_ids {
            let zone = self.zones.get_mut(&id).unwrap();
            if !zone.should_capture_tick(now) {
                continue;
            }
            let dt = zone
                .last_capture_tick
                .map(|t| now.duration_since(t))
                .unwrap_or(zone.config.capture_tick);
            zone.last_capture_tick = Some(now);
            if let Some(new_controller) = zone.apply_capture_tick(dt) {
                events.push(WorldPvpEvent::ZoneCaptured { zone: id, new_controller });
            }
        }

        for event in &events {
            self.events.publish(event.clone());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Aabb;

    fn zone_config() -> ZoneConfig {
        ZoneConfig::contested(
            ZoneId::new(),
            "contested-pass",
            Aabb { min: (0.0, 0.0, 0.0), max: (10.0, 10.0, 10.0) },
        )
    }

    #[test]
    fn entering_zone_flags_player() {
        let mut runtime = WorldPvpRuntime::new(WorldPvpConfig::default());
        let config = zone_config();
        runtime.register_zone(config.clone()).unwrap();
        runtime.set_faction(PlayerId(1), Faction::Alliance);
        runtime.update_position(PlayerId(1), (1.0, 1.0, 1.0));

        let events = runtime.tick(Instant::now());
        assert!(events
            .iter()
            .any(|e| matches!(e, WorldPvpEvent::PlayerFlagged { player, zone } if *player == PlayerId(1) && *zone == config.id)));
    }

    #[test]
    fn same_faction_cannot_attack_in_contested_zone() {
        let mut runtime = WorldPvpRuntime::new(WorldPvpConfig::default());
        runtime.register_zone(zone_config()).unwrap();
        runtime.set_faction(PlayerId(1), Faction::Alliance);
        runtime.set_faction(PlayerId(2), Faction::Alliance);
        runtime.update_position(PlayerId(1), (1.0, 1.0, 1.0));
        runtime.update_position(PlayerId(2), (2.0, 2.0, 2.0));
        runtime.tick(Instant::now());
        assert!(!runtime.can_attack(PlayerId(1), PlayerId(2)));
    }

    #[test]
    fn opposite_factions_can_attack_once_flagged() {
        let mut runtime = WorldPvpRuntime::new(WorldPvpConfig::default());
        runtime.register_zone(zone_config()).unwrap();
        runtime.set_faction(PlayerId(1), Faction::Alliance);
        runtime.set_faction(PlayerId(2), Faction::Horde);
        runtime.update_position(PlayerId(1), (1.0, 1.0, 1.0));
        runtime.update_position(PlayerId(2), (2.0, 2.0, 2.0));
        runtime.tick(Instant::now());
        assert!(runtime.can_attack(PlayerId(1), PlayerId(2)));
    }

    #[test]
    fn leaving_zone_eventually_unflags() {
        let mut runtime = WorldPvpRuntime::new(WorldPvpConfig {
            flag_expiry: std::time::Duration::from_millis(10),
            membership_refresh: std::time::Duration::from_millis(1),
            ..WorldPvpConfig::default()
        });
        runtime.register_zone(zone_config()).unwrap();
        runtime.set_faction(PlayerId(1), Faction::Alliance);
        runtime.update_position(PlayerId(1), (1.0, 1.0, 1.0));
        let t0 = Instant::now();
        runtime.tick(t0);
        runtime.update_position(PlayerId(1), (-5.0, -5.0, -5.0));
        runtime.tick(t0 + std::time::Duration::from_millis(5));
        let events = runtime.tick(t0 + std::time::Duration::from_millis(20));
        assert!(events
            .iter()
            .any(|e| matches!(e, WorldPvpEvent::PlayerUnflagged { player } if *player == PlayerId(1))));
    }

    #[test]
    fn capture_flips_control_to_dominant_faction() {
        let mut runtime = WorldPvpRuntime::new(WorldPvpConfig::default());
        let mut config = zone_config();
        config.capture_rate = 1000.0;
        config.capture_tick = std::time::Duration::from_millis(1);
        let zone_id = config.id;
        runtime.register_zone(config).unwrap();
        runtime.set_faction(PlayerId(1), Faction::Alliance);
        runtime.update_position(PlayerId(1), (1.0, 1.0, 1.0));

        let t0 = Instant::now();
        runtime.tick(t0);
        let events = runtime.tick(t0 + std::time::Duration::from_millis(5));
        assert!(events
            .iter()
            .any(|e| matches!(e, WorldPvpEvent::ZoneCaptured { zone, new_controller } if *zone == zone_id && *new_controller == Faction::Alliance)));
    }
}
