use std::collections::{HashMap, HashSet};
use std::time::Instant;

use common::events::EventBus;
use common::ids::{GuildId, PlayerId, WarId};

use crate::config::WarConfig;
use crate::error::GuildWarError;
use crate::events::GuildWarEvent;
use crate::objective::Objective;
use crate::war::War;
use tracing::info;

#[derive(Debug, Clone)]
pub struct WarOutcome {
    pub war: WarId,
    pub winner: Option<GuildId>,
    pub score_a: u32,
    pub score_b: u32,
    /// Rosters at the moment of conclusion, for instanced callers that need
    /// to teleport participants back out.
    pub participants_a: Vec<PlayerId>,
    pub participants_b: Vec<PlayerId>,
}

#[derive(Default)]
pub struct GuildWarEngine {
    wars: HashMap<WarId, War>,
    active_wars: HashMap<GuildId, HashSet<WarId>>,
    /// At most one active war per player (open question resolved in DESIGN.md).
    player_war: HashMap<PlayerId, WarId>,
    events: EventBus<GuildWarEvent>,
}

impl GuildWarEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &EventBus<GuildWarEvent> {
        &self.events
    }

    fn slots_used(&self, guild: GuildId) -> usize {
        self.active_wars.get(&guild).map(|s| s.len()).unwrap_or(0)
    }

    pub fn declare(
        &mut self,
        config: WarConfig,
        guild_a: GuildId,
        guild_b: GuildId,
        objectives: Vec<Objective>,
        now: Instant,
    ) -> Result<WarId, GuildWarError> {
        let max = config.max_concurrent_wars as usize;
        if self.slots_used(guild_a) >= max {
            return Err(GuildWarError::WarSlotsExhausted(guild_a));
        }
        if self.slots_used(guild_b) >= max {
            return Err(GuildWarError::WarSlotsExhausted(guild_b));
        }

        let id = WarId::new();
        let mut war = War::new(id, config, guild_a, guild_b, now);
        for objective in objectives {
            war.add_objective(objective);
        }
        self.wars.insert(id, war);
        self.active_wars.entry(guild_a).or_default().insert(id);
        self.active_wars.entry(guild_b).or_default().insert(id);

        self.events.publish(GuildWarEvent::WarDeclared { war: id, guild_a, guild_b });
        Ok(id)
    }

    pub fn accept(&mut self, war: WarId, now: Instant) -> Result<(), GuildWarError> {
        let w = self.wars.get_mut(&war).ok_or(GuildWarError::UnknownWar(war))?;
        let event = w.accept(now)?;
        self.events.publish(event);
        Ok(())
    }

    pub fn join(&mut self, war: WarId, player: PlayerId, guild: GuildId) -> Result<(), GuildWarError> {
        if let Some(&other) = self.player_war.get(&player) {
            if other != war {
                return Err(GuildWarError::AlreadyInWar(player));
            }
        }
        let w = self.wars.get_mut(&war).ok_or(GuildWarError::UnknownWar(war))?;
        w.join(player, guild)?;
        self.player_war.insert(player, war);
        self.events.publish(GuildWarEvent::ParticipantJoined { war, player, guild });
        Ok(())
    }

    pub fn on_kill(&mut self, war: WarId, killer: PlayerId, victim: PlayerId) -> Result<(), GuildWarError> {
        let w = self.wars.get_mut(&war).ok_or(GuildWarError::UnknownWar(war))?;
        w.on_kill(killer, victim);
        Ok(())
    }

    pub fn is_at_war(&self, guild_a: GuildId, guild_b: GuildId) -> bool {
        self.wars
            .values()
            .any(|w| !w.phase.is_terminal() && ((w.guild_a == guild_a && w.guild_b == guild_b) || (w.guild_a == guild_b && w.guild_b == guild_a)))
    }

    pub fn active_war_count(&self, guild: GuildId) -> usize {
        self.slots_used(guild)
    }

    /// Advances every non-terminal war by one tick, releasing concluded
    /// wars' guild slots and returning their outcomes.
    pub fn tick(&mut self, now: Instant) -> Vec<WarOutcome> {
        let mut outcomes = Vec::new();
        let mut concluded = Vec::new();

        for (&id, war) in self.wars.iter_mut() {
            if war.phase.is_terminal() {
                continue;
            }
            let (events, outcome) = war.tick(now);
            for event in events {
                self.events.publish(event);
            }
            if let Some((winner, score_a, score_b, participants_a, participants_b)) = outcome {
                info!(war = %id, ?winner, score_a, score_b, "guild war concluded");
                self.events.publish(GuildWarEvent::WarEnded { war: id, winner, score_a, score_b });
                outcomes.push(WarOutcome {
                    war: id,
                    winner,
                    score_a,
                    score_b,
                    participants_a,
                    participants_b,
                });
                concluded.push((id, war.guild_a, war.guild_b));
            }
        }

        for (id, guild_a, guild_b) in concluded {
            if let Some(slots) = self.active_wars.get_mut(&guild_a) {
                slots.remove(&id);
            }
            if let Some(slots) = self.active_wars.get_mut(&guild_b) {
                slots.remove(&id);
            }
            self.player_war.retain(|_, &mut w| w != id);
        }

        outcomes
    }

    pub fn war(&self, id: WarId) -> Option<&War> {
        self.wars.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WarPhase;
    use std::time::Duration;

    #[test]
    fn war_progresses_through_phases_and_kills_decide_the_winner() {
        let mut engine = GuildWarEngine::new();
        let guild_a = GuildId(1);
        let guild_b = GuildId(2);
        let t0 = Instant::now();

        let war = engine
            .declare(WarConfig::instanced(), guild_a, guild_b, vec![Objective::new(1, "keep", 50)], t0)
            .unwrap();
        engine.accept(war, t0).unwrap();
        engine.join(war, PlayerId(1), guild_a).unwrap();
        engine.join(war, PlayerId(2), guild_b).unwrap();

        let t1 = t0 + Duration::from_secs(3600) + Duration::from_secs(1);
        engine.tick(t1);
        assert_eq!(engine.war(war).unwrap().phase, WarPhase::Active);

        engine.on_kill(war, PlayerId(1), PlayerId(2)).unwrap();
        engine.on_kill(war, PlayerId(1), PlayerId(2)).unwrap();

        let t2 = t1 + Duration::from_secs(2 * 3600) + Duration::from_secs(1);
        engine.tick(t2);
        assert_eq!(engine.war(war).unwrap().phase, WarPhase::Resolution);

        let t3 = t2 + Duration::from_secs(600) + Duration::from_secs(1);
        let outcomes = engine.tick(t3);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].winner, Some(guild_a));
        assert_eq!(engine.active_war_count(guild_a), 0);
        assert_eq!(engine.active_war_count(guild_b), 0);
    }

    #[test]
    fn unanswered_declaration_expires_without_outcome() {
        let mut engine = GuildWarEngine::new();
        let t0 = Instant::now();
        let war = engine
            .declare(WarConfig::instanced(), GuildId(1), GuildId(2), vec![], t0)
            .unwrap();

        let t1 = t0 + Duration::from_secs(24 * 3600) + Duration::from_secs(1);
        let outcomes = engine.tick(t1);
        assert_eq!(outcomes[0].winner, None);
        assert_eq!(engine.war(war).unwrap().phase, WarPhase::Expired);
    }

    #[test]
    fn war_slots_are_exhausted_per_guild() {
        let mut engine = GuildWarEngine::new();
        let guild_a = GuildId(1);
        let mut config = WarConfig::instanced();
        config.max_concurrent_wars = 1;
        let t0 = Instant::now();
        engine.declare(config.clone(), guild_a, GuildId(2), vec![], t0).unwrap();
        let err = engine.declare(config, guild_a, GuildId(3), vec![], t0).unwrap_err();
        assert!(matches!(err, GuildWarError::WarSlotsExhausted(g) if g == guild_a));
    }

    #[test]
    fn a_player_cannot_join_two_active_wars_at_once() {
        let mut engine = GuildWarEngine::new();
        let t0 = Instant::now();
        let war1 = engine.declare(WarConfig::instanced(), GuildId(1), GuildId(2), vec![], t0).unwrap();
        let war2 = engine.declare(WarConfig::instanced(), GuildId(1), GuildId(3), vec![], t0).unwrap();

        engine.join(war1, PlayerId(1), GuildId(1)).unwrap();
        let err = engine.join(war2, PlayerId(1), GuildId(1)).unwrap_err();
        assert!(matches!(err, GuildWarError::AlreadyInWar(p) if p == PlayerId(1)));
    }
}
