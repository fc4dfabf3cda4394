use std::collections::HashMap;
use std::time::Instant;

use common::events::EventBus;
use common::ids::{MatchId, PlayerId};
use tracing::info;

use crate::config::MatchConfig;
use crate::error::ArenaError;
use crate::events::{ArenaEvent, MatchResult};
use crate::state::MatchState;
use crate::stats::{select_mvp, PlayerStats};

pub struct ArenaMatch {
    pub id: MatchId,
    pub config: MatchConfig,
    pub state: MatchState,
    pub players: HashMap<PlayerId, PlayerStats>,
    pub team_scores: HashMap<u8, u32>,
    pub created_at: Instant,
    pub countdown_until: Option<Instant>,
    pub started_at: Option<Instant>,
    pub sudden_death_started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub winner: Option<u8>,
}

impl ArenaMatch {
    pub fn new(id: MatchId, config: MatchConfig, now: Instant) -> Self {
        Self {
            id,
            config,
            state: MatchState::WaitingForPlayers,
            players: HashMap::new(),
            team_scores: HashMap::new(),
            created_at: now,
            countdown_until: None,
            started_at: None,
            sudden_death_started_at: None,
            finished_at: None,
            winner: None,
        }
    }

    pub fn add_player(&mut self, player: PlayerId, team: u8) -> Result<(), ArenaError> {
        if self.state != MatchState::WaitingForPlayers {
            return Err(ArenaError::StateConflict(self.id));
        }
        let capacity = self.config.team_size as usize * 2;
        if self.players.len() >= capacity {
            return Err(ArenaError::MatchFull(self.id));
        }
        self.players.insert(player, PlayerStats::new(player, team));
        self.team_scores.entry(team).or_insert(0);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.players.len() == self.config.team_size as usize * 2
    }

    fn transition(&mut self, next: MatchState) -> Result<(), ArenaError> {
        if !self.state.can_transition_to(next) {
            return Err(ArenaError::StateConflict(self.id));
        }
        self.state = next;
        Ok(())
    }

    pub fn start_countdown(&mut self, now: Instant) -> Result<(), ArenaError> {
        self.transition(MatchState::Countdown)?;
        self.countdown_until = Some(now + self.config.countdown);
        Ok(())
    }

    pub fn on_kill(&mut self, killer: PlayerId, victim: PlayerId, assister: Option<PlayerId>, now: Instant) {
        if self.state.is_terminal() {
            return;
        }
        let victim_team = self.players.get(&victim).map(|p| p.team);
        if let Some(stats) = self.players.get_mut(&killer) {
            stats.kills += 1;
            *self.team_scores.entry(stats.team).or_insert(0) += 1;
        }
        if let Some(player) = assister {
            if let Some(stats) = self.players.get_mut(&player) {
                stats.assists += 1;
            }
        }
        if let Some(stats) = self.players.get_mut(&victim) {
            stats.deaths += 1;
            stats.respawn_at = Some(now + self.config.respawn_seconds);
        }
        let _ = victim_team;
    }

    pub fn on_damage(&mut self, attacker: PlayerId, amount: u64, target: PlayerId, target_damage_taken: u64) {
        if let Some(stats) = self.players.get_mut(&attacker) {
            stats.damage_dealt += amount;
        }
        if let Some(stats) = self.players.get_mut(&target) {
            stats.damage_taken += target_damage_taken;
        }
    }

    pub fn on_heal(&mut self, healer: PlayerId, amount: u64) {
        if let Some(stats) = self.players.get_mut(&healer) {
            stats.healing += amount;
        }
    }

    pub fn on_crowd_control(&mut self, source: PlayerId, score: u32) {
        if let Some(stats) = self.players.get_mut(&source) {
            stats.cc_score += score;
        }
    }

    pub fn set_connected(&mut self, player: PlayerId, connected: bool) {
        if let Some(stats) = self.players.get_mut(&player) {
            stats.connected = connected;
        }
    }

    fn teams(&self) -> Vec<Vec<PlayerId>> {
        let mut by_team: HashMap<u8, Vec<PlayerId>> = HashMap::new();
        for stats in self.players.values() {
            by_team.entry(stats.team).or_default().push(stats.player);
        }
        let mut teams: Vec<u8> = by_team.keys().copied().collect();
        teams.sort();
        teams.into_iter().map(|t| by_team.remove(&t).unwrap()).collect()
    }

    fn team_has_alive_connected(&self, team: u8) -> bool {
        self.players
            .values()
            .any(|p| p.team == team && p.connected && p.is_alive())
    }

    /// Advances countdown/respawn/sudden-death timers and checks victory
    /// conditions. Returns `Some(event)` if the match transitioned this
    /// call.
    pub fn tick(&mut self, now: Instant) -> Option<ArenaEvent> {
        match self.state {
            MatchState::Countdown => {
                if self.countdown_until.map(|t| now >= t).unwrap_or(false) {
                    self.state = MatchState::InProgress;
                    self.started_at = Some(now);
                    return Some(ArenaEvent::MatchStarted { match_id: self.id });
                }
                None
            }
            MatchState::InProgress | MatchState::SuddenDeath => {
                for stats in self.players.values_mut() {
                    if let Some(at) = stats.respawn_at {
                        if now >= at {
                            stats.respawn_at = None;
                        }
                    }
                }

                if self.state == MatchState::InProgress && self.config.sudden_death_enabled {
                    if let Some(started) = self.started_at {
                        if now.duration_since(started) >= self.config.sudden_death_after {
                            self.state = MatchState::SuddenDeath;
                            self.sudden_death_started_at = Some(now);
                            return Some(ArenaEvent::SuddenDeathStarted { match_id: self.id });
                        }
                    }
                }

                self.check_victory(now)
            }
            _ => None,
        }
    }

    fn check_victory(&mut self, now: Instant) -> Option<ArenaEvent> {
        let teams = self.teams();
        if teams.len() < 2 {
            return None;
        }

        let limit = self.score_limit_for_mode();
        if let Some((&team, _)) = self.team_scores.iter().find(|(_, &score)| score >= limit) {
            return self.finish(Some(team), false, now);
        }

        let alive_teams: Vec<u8> = teams
            .iter()
            .enumerate()
            .filter(|(i, _)| self.team_has_alive_connected(*i as u8))
            .map(|(i, _)| i as u8)
            .collect();
        if alive_teams.len() == 1 {
            return self.finish(Some(alive_teams[0]), false, now);
        }
        if alive_teams.is_empty() {
            return self.finish(None, true, now);
        }

        if let Some(started) = self.started_at {
            if now.duration_since(started) >= self.config.time_limit {
                let mut scores: Vec<(u8, u32)> =
                    self.team_scores.iter().map(|(&t, &s)| (t, s)).collect();
                scores.sort_by(|a, b| b.1.cmp(&a.1));
                if scores.len() >= 2 && scores[0].1 == scores[1].1 {
                    if self.config.sudden_death_enabled && self.state != MatchState::SuddenDeath {
                        self.state = MatchState::SuddenDeath;
                        self.sudden_death_started_at = Some(now);
                        return Some(ArenaEvent::SuddenDeathStarted { match_id: self.id });
                    }
                    return self.finish(None, true, now);
                }
                return self.finish(scores.first().map(|(t, _)| *t), false, now);
            }
        }
        None
    }

    fn score_limit_for_mode(&self) -> u32 {
        self.config.score_limit
    }

    fn finish(&mut self, winner: Option<u8>, is_draw: bool, now: Instant) -> Option<ArenaEvent> {
        self.transition(MatchState::Finished).ok()?;
        self.finished_at = Some(now);
        self.winner = winner;
        let mvp = select_mvp(&self.players.values().cloned().collect::<Vec<_>>());
        let result = MatchResult {
            match_id: self.id,
            winner,
            teams: self.teams(),
            mvp,
            is_draw,
        };
        info!(match_id = %self.id, ?winner, is_draw, "arena match finished");
        Some(ArenaEvent::MatchFinished(result))
    }

    pub fn abandon(&mut self, now: Instant) -> Option<ArenaEvent> {
        if self.transition(MatchState::Abandoned).is_err() {
            return None;
        }
        self.finished_at = Some(now);
        Some(ArenaEvent::MatchAbandoned { match_id: self.id })
    }
}

pub struct ArenaRuntime {
    matches: HashMap<MatchId, ArenaMatch>,
    events: EventBus<ArenaEvent>,
}

impl ArenaRuntime {
    pub fn new() -> Self {
        Self {
            matches: HashMap::new(),
            events: EventBus::default(),
        }
    }

    pub fn events(&self) -> &EventBus<ArenaEvent> {
        &self.events
    }

    pub fn create(&mut self, config: MatchConfig, now: Instant) -> MatchId {
        let id = MatchId::new();
        self.matches.insert(id, ArenaMatch::new(id, config, now));
        id
    }

    pub fn get(&self, id: MatchId) -> Option<&ArenaMatch> {
        self.matches.get(&id)
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut ArenaMatch> {
        self.matches.get_mut(&id)
    }

    pub fn add_player(&mut self, id: MatchId, player: PlayerId, team: u8) -> Result<(), ArenaError> {
        let m = self.matches.get_mut(&id).ok_or(ArenaError::UnknownMatch(id))?;
        m.add_player(player, team)
    }

    pub fn start_countdown(&mut self, id: MatchId, now: Instant) -> Result<(), ArenaError> {
        let m = self.matches.get_mut(&id).ok_or(ArenaError::UnknownMatch(id))?;
        m.start_countdown(now)
    }

    pub fn active_count(&self) -> usize {
        self.matches.values().filter(|m| !m.state.is_terminal()).count()
    }

    pub fn matches(&self) -> impl Iterator<Item = &ArenaMatch> {
        self.matches.values()
    }

    /// Advances every non-terminal match and publishes resulting events.
    pub fn tick(&mut self, now: Instant) {
        for m in self.matches.values_mut() {
            if m.state.is_terminal() {
                continue;
            }
            if let Some(event) = m.tick(now) {
                self.events.publish(event);
            }
        }
    }

    /// Removes matches that finished more than `retain_for` ago, freeing
    /// memory for long-running processes.
    pub fn sweep_finished(&mut self, now: Instant, retain_for: std::time::Duration) {
        self.matches.retain(|_, m| match m.finished_at {
            Some(at) => now.duration_since(at) < retain_for,
            None => true,
        });
    }
}

impl Default for ArenaRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pid(n: u64) -> PlayerId {
        PlayerId(n)
    }

    fn setup_1v1(now: Instant) -> (ArenaRuntime, MatchId) {
        let mut runtime = ArenaRuntime::new();
        let id = runtime.create(MatchConfig::arena_1v1(), now);
        runtime.add_player(id, pid(1), 0).unwrap();
        runtime.add_player(id, pid(2), 1).unwrap();
        runtime.start_countdown(id, now).unwrap();
        (runtime, id)
    }

    #[test]
    fn elimination_ends_match_within_one_tick() {
        let now = Instant::now();
        let (mut runtime, id) = setup_1v1(now);
        let after_countdown = now + Duration::from_secs(11);
        runtime.tick(after_countdown);
        assert_eq!(runtime.get(id).unwrap().state, MatchState::InProgress);

        runtime.get_mut(id).unwrap().on_kill(pid(1), pid(2), None, after_countdown);
        runtime.tick(after_countdown);

        let m = runtime.get(id).unwrap();
        assert_eq!(m.state, MatchState::Finished);
        assert_eq!(m.winner, Some(0));
    }

    #[test]
    fn draw_on_time_with_equal_scores_and_no_sudden_death() {
        let now = Instant::now();
        let mut runtime = ArenaRuntime::new();
        let mut config = MatchConfig::arena_3v3();
        config.sudden_death_enabled = false;
        config.time_limit = Duration::from_secs(600);
        config.score_limit = 1_000_000;
        let id = runtime.create(config, now);
        for p in 1..=3u64 {
            runtime.add_player(id, pid(p), 0).unwrap();
        }
        for p in 4..=6u64 {
            runtime.add_player(id, pid(p), 1).unwrap();
        }
        runtime.start_countdown(id, now).unwrap();
        let after_countdown = now + Duration::from_secs(16);
        runtime.tick(after_countdown);

        let m = runtime.get_mut(id).unwrap();
        m.on_kill(pid(1), pid(4), None, after_countdown);
        m.on_kill(pid(4), pid(1), None, after_countdown);
        for p in [pid(1), pid(2), pid(3), pid(4), pid(5), pid(6)] {
            m.set_connected(p, true);
        }

        let at_limit = after_countdown + Duration::from_secs(601);
        runtime.tick(at_limit);

        let m = runtime.get(id).unwrap();
        assert_eq!(m.state, MatchState::Finished);
        assert!(m.winner.is_none());
    }

    #[test]
    fn sudden_death_triggers_after_configured_duration() {
        let now = Instant::now();
        let (mut runtime, id) = setup_1v1(now);
        let started = now + Duration::from_secs(11);
        runtime.tick(started);

        let deep_in_match = started + Duration::from_secs(481);
        runtime.tick(deep_in_match);

        assert_eq!(runtime.get(id).unwrap().state, MatchState::SuddenDeath);
    }

    #[test]
    fn state_machine_never_regresses() {
        assert!(!MatchState::Finished.can_transition_to(MatchState::InProgress));
        assert!(!MatchState::Abandoned.can_transition_to(MatchState::Finished));
    }
}
