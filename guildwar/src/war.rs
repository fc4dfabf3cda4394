use std::collections::{HashMap, HashSet};
use std::time::Instant;

use common::ids::{GuildId, PlayerId, WarId};

use crate::config::WarConfig;
use crate::error::GuildWarError;
use crate::events::GuildWarEvent;
use crate::objective::Objective;
use crate::state::WarPhase;

pub struct War {
    pub id: WarId,
    pub config: WarConfig,
    pub guild_a: GuildId,
    pub guild_b: GuildId,
    pub phase: WarPhase,
    pub declared_at: Instant,
    pub phase_deadline: Instant,
    pub objectives: HashMap<u32, Objective>,
    pub score_a: u32,
    pub score_b: u32,
    pub kills_a: u32,
    pub kills_b: u32,
    pub territory_minutes_a: f32,
    pub territory_minutes_b: f32,
    pub participants_a: HashSet<PlayerId>,
    pub participants_b: HashSet<PlayerId>,
    pub player_guild: HashMap<PlayerId, GuildId>,
    /// Last capture-tick timestamp per objective, for territory-minute dt.
    last_objective_tick: HashMap<u32, Instant>,
}

impl War {
    pub fn new(id: WarId, config: WarConfig, guild_a: GuildId, guild_b: GuildId, now: Instant) -> Self {
        let phase_deadline = now + config.declaration_window;
        Self {
            id,
            config,
            guild_a,
            guild_b,
            phase: WarPhase::Declaration,
            declared_at: now,
            phase_deadline,
            objectives: HashMap::new(),
            score_a: 0,
            score_b: 0,
            kills_a: 0,
            kills_b: 0,
            territory_minutes_a: 0.0,
            territory_minutes_b: 0.0,
            participants_a: HashSet::new(),
            participants_b: HashSet::new(),
            player_guild: HashMap::new(),
            last_objective_tick: HashMap::new(),
        }
    }

    pub fn add_objective(&mut self, objective: Objective) {
        self.objectives.insert(objective.id, objective);
    }

    pub fn join(&mut self, player: PlayerId, guild: GuildId) -> Result<(), GuildWarError> {
        if guild == self.guild_a {
            self.participants_a.insert(player);
        } else if guild == self.guild_b {
            self.participants_b.insert(player);
        } else {
            return Err(GuildWarError::NotParticipant(guild));
        }
        self.player_guild.insert(player, guild);
        Ok(())
    }

    pub fn accept(&mut self, now: Instant) -> Result<GuildWarEvent, GuildWarError> {
        if self.phase != WarPhase::Declaration {
            return Err(GuildWarError::NotAwaitingResponse(self.id));
        }
        self.phase = WarPhase::Preparation;
        self.phase_deadline = now + self.config.preparation_window;
        Ok(GuildWarEvent::WarAccepted { war: self.id })
    }

    pub fn participants(&self) -> (&HashSet<PlayerId>, &HashSet<PlayerId>) {
        (&self.participants_a, &self.participants_b)
    }

    pub fn is_instanced(&self) -> bool {
        self.config.variant == crate::config::WarVariant::Instanced
    }

    fn headcounts(&self) -> (u32, u32) {
        (self.participants_a.len() as u32, self.participants_b.len() as u32)
    }

    fn record_kill(&mut self, killer: PlayerId) {
        match self.player_guild.get(&killer) {
            Some(&g) if g == self.guild_a => {
                self.kills_a += 1;
                self.score_a += self.config.points_per_kill;
            }
            Some(&g) if g == self.guild_b => {
                self.kills_b += 1;
                self.score_b += self.config.points_per_kill;
            }
            _ => {}
        }
    }

    pub fn on_kill(&mut self, killer: PlayerId, _victim: PlayerId) {
        if self.phase == WarPhase::Active {
            self.record_kill(killer);
        }
    }

    fn all_objectives_held_by(&self, guild: GuildId) -> bool {
        !self.objectives.is_empty() && self.objectives.values().all(|o| o.controlling_guild == Some(guild))
    }

    /// Clears participant membership and releases every objective's
    /// territory claim. Called once a war reaches a terminal phase; the
    /// caller is responsible for reading `participants()` beforehand if it
    /// still needs the roster (e.g. to teleport instanced participants out).
    fn cleanup(&mut self) {
        self.participants_a.clear();
        self.participants_b.clear();
        self.player_guild.clear();
        for objective in self.objectives.values_mut() {
            objective.release_claim();
        }
    }

    /// Advances phases by deadline and, while active, runs capture ticks on
    /// every objective and accrues territory-minute score. Returns events
    /// raised this tick plus `Some(outcome)` once the war concludes, where
    /// `outcome` carries the roster each side had at conclusion (captured
    /// before `cleanup` clears it, so instanced callers can still teleport
    /// participants back out).
    pub fn tick(
        &mut self,
        now: Instant,
    ) -> (Vec<GuildWarEvent>, Option<(Option<GuildId>, u32, u32, Vec<PlayerId>, Vec<PlayerId>)>) {
        let mut events = Vec::new();

        if !self.phase.is_terminal() && now >= self.phase_deadline {
            match self.phase {
                WarPhase::Declaration => {
                    self.phase = WarPhase::Expired;
                    events.push(GuildWarEvent::WarExpired { war: self.id });
                    let participants_a = self.participants_a.iter().copied().collect();
                    let participants_b = self.participants_b.iter().copied().collect();
                    self.cleanup();
                    return (events, Some((None, 0, 0, participants_a, participants_b)));
                }
                WarPhase::Preparation => {
                    self.phase = WarPhase::Active;
                    self.phase_deadline = now + self.config.active_duration;
                    events.push(GuildWarEvent::WarStarted { war: self.id });
                }
                WarPhase::Active => {
                    self.phase = WarPhase::Resolution;
                    self.phase_deadline = now + self.config.resolution_window;
                }
                WarPhase::Resolution => {
                    self.phase = WarPhase::Completed;
                    let participants_a = self.participants_a.iter().copied().collect();
                    let participants_b = self.participants_b.iter().copied().collect();
                    let (winner, score_a, score_b) = self.determine_outcome();
                    self.cleanup();
                    return (events, Some((winner, score_a, score_b, participants_a, participants_b)));
                }
                WarPhase::Completed | WarPhase::Expired => {}
            }
        }

        if self.phase == WarPhase::Active {
            let (count_a, count_b) = self.headcounts();
            let ids: Vec<u32> = self.objectives.keys().copied().collect();
            for oid in ids {
                let dt = self
                    .last_objective_tick
                    .get(&oid)
                    .map(|t| now.duration_since(*t))
                    .unwrap_or_default();
                self.last_objective_tick.insert(oid, now);
                let (guild_a, guild_b, config) = (self.guild_a, self.guild_b, self.config.clone());
                let objective = self.objectives.get_mut(&oid).unwrap();
                let controlled_by = objective.controlling_guild;
                if let Some(controller) = objective.apply_capture_tick(guild_a, count_a, guild_b, count_b, &config, dt) {
                    if controller == self.guild_a {
                        self.score_a += self.config.points_per_objective;
                    } else {
                        self.score_b += self.config.points_per_objective;
                    }
                    events.push(GuildWarEvent::ObjectiveCaptured { war: self.id, objective: oid, controller });
                } else if self.config.points_per_territory_minute > 0 {
                    let minutes = dt.as_secs_f32() / 60.0;
                    match controlled_by {
                        Some(g) if g == self.guild_a => {
                            self.territory_minutes_a += minutes;
                            self.score_a += (minutes * self.config.points_per_territory_minute as f32) as u32;
                        }
                        Some(g) if g == self.guild_b => {
                            self.territory_minutes_b += minutes;
                            self.score_b += (minutes * self.config.points_per_territory_minute as f32) as u32;
                        }
                        _ => {}
                    }
                }
            }

            if self.score_a >= self.config.score_cap || self.score_b >= self.config.score_cap {
                self.phase = WarPhase::Resolution;
                self.phase_deadline = now;
            } else if self.all_objectives_held_by(self.guild_a) || self.all_objectives_held_by(self.guild_b) {
                self.phase = WarPhase::Resolution;
                self.phase_deadline = now;
            }
        }

        (events, None)
    }

    fn determine_outcome(&self) -> (Option<GuildId>, u32, u32) {
        let winner = match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Some(self.guild_a),
            std::cmp::Ordering::Less => Some(self.guild_b),
            std::cmp::Ordering::Equal => None,
        };
        (winner, self.score_a, self.score_b)
    }
}
