use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::events::EventBus;
use common::ids::{MatchId, PlayerId, TournamentId};

use crate::bracket::{build_double_elimination, build_single_elimination, record_result, swiss_pairing, Bracket};
use crate::error::TournamentError;
use crate::events::TournamentEvent;
use crate::format::TournamentFormat;
use crate::seeding::round_robin_schedule;
use crate::state::TournamentState;

/// Share of the prize pool each final placement receives. Fractions need not
/// sum to exactly 1.0; any remainder is left unawarded.
#[derive(Debug, Clone)]
pub struct PrizeDistribution(pub Vec<(u8, f64)>);

impl Default for PrizeDistribution {
    fn default() -> Self {
        Self(vec![(1, 0.5), (2, 0.3), (3, 0.2)])
    }
}

#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub format: TournamentFormat,
    /// Matchmaking/rating mode this tournament's matches are played and
    /// seeded under (ratings are read from this mode when seeding).
    pub mode: String,
    pub min_participants: usize,
    pub max_participants: usize,
    pub prize_pool: u64,
    pub prize_distribution: PrizeDistribution,
    pub swiss_rounds: u32,
    /// How long registration stays open before `tick` auto-opens check-in.
    pub registration_window: Duration,
    /// How long check-in stays open before `tick` auto-starts (or cancels
    /// for lack of participants).
    pub check_in_window: Duration,
}

impl TournamentConfig {
    pub fn single_elimination(mode: impl Into<String>, max_participants: usize, prize_pool: u64) -> Self {
        Self {
            format: TournamentFormat::SingleElimination,
            mode: mode.into(),
            min_participants: 4,
            max_participants,
            prize_pool,
            prize_distribution: PrizeDistribution::default(),
            swiss_rounds: 0,
            registration_window: Duration::minutes(30),
            check_in_window: Duration::minutes(10),
        }
    }

    pub fn double_elimination(mode: impl Into<String>, max_participants: usize, prize_pool: u64) -> Self {
        Self {
            format: TournamentFormat::DoubleElimination,
            mode: mode.into(),
            min_participants: 4,
            max_participants,
            prize_pool,
            prize_distribution: PrizeDistribution::default(),
            swiss_rounds: 0,
            registration_window: Duration::minutes(30),
            check_in_window: Duration::minutes(10),
        }
    }

    pub fn round_robin(mode: impl Into<String>, max_participants: usize, prize_pool: u64) -> Self {
        Self {
            format: TournamentFormat::RoundRobin,
            mode: mode.into(),
            min_participants: 3,
            max_participants,
            prize_pool,
            prize_distribution: PrizeDistribution::default(),
            swiss_rounds: 0,
            registration_window: Duration::minutes(30),
            check_in_window: Duration::minutes(10),
        }
    }

    pub fn swiss(mode: impl Into<String>, max_participants: usize, prize_pool: u64, rounds: u32) -> Self {
        Self {
            format: TournamentFormat::Swiss,
            mode: mode.into(),
            min_participants: 4,
            max_participants,
            prize_pool,
            prize_distribution: PrizeDistribution::default(),
            swiss_rounds: rounds,
            registration_window: Duration::minutes(30),
            check_in_window: Duration::minutes(10),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Bracket(NodeIndex),
    RoundRobin { a: PlayerId, b: PlayerId },
    Swiss { a: PlayerId, b: PlayerId },
}

pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    pub state: TournamentState,
    registered: Vec<PlayerId>,
    checked_in: HashSet<PlayerId>,
    bracket: Option<Bracket>,
    rr_schedule: Vec<Vec<(usize, usize)>>,
    rr_current_round: usize,
    rr_wins: HashMap<PlayerId, u32>,
    swiss_scores: HashMap<PlayerId, f64>,
    swiss_played: HashSet<(PlayerId, PlayerId)>,
    swiss_round: u32,
    swiss_active: Vec<(PlayerId, PlayerId)>,
    dispatched: HashMap<MatchId, Pending>,
    champion: Option<PlayerId>,
    created_at: DateTime<Utc>,
    /// When the current phase (registration or check-in) auto-advances.
    phase_deadline: DateTime<Utc>,
}

impl Tournament {
    fn new(id: TournamentId, config: TournamentConfig, now: DateTime<Utc>) -> Self {
        let phase_deadline = now + config.registration_window;
        Self {
            id,
            config,
            state: TournamentState::Registration,
            registered: Vec::new(),
            checked_in: HashSet::new(),
            bracket: None,
            rr_schedule: Vec::new(),
            rr_current_round: 0,
            rr_wins: HashMap::new(),
            swiss_scores: HashMap::new(),
            swiss_played: HashSet::new(),
            swiss_round: 0,
            swiss_active: Vec::new(),
            dispatched: HashMap::new(),
            champion: None,
            created_at: now,
            phase_deadline,
        }
    }

    fn register(&mut self, player: PlayerId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Registration {
            return Err(TournamentError::RegistrationClosed);
        }
        if self.registered.contains(&player) {
            return Err(TournamentError::AlreadyRegistered);
        }
        if self.registered.len() >= self.config.max_participants {
            return Err(TournamentError::RegistrationClosed);
        }
        self.registered.push(player);
        Ok(())
    }

    fn open_check_in(&mut self, now: DateTime<Utc>) -> Result<(), TournamentError> {
        if !self.state.can_transition_to(TournamentState::CheckIn) {
            return Err(TournamentError::StateConflict);
        }
        self.state = TournamentState::CheckIn;
        self.phase_deadline = now + self.config.check_in_window;
        Ok(())
    }

    fn check_in(&mut self, player: PlayerId) -> Result<(), TournamentError> {
        if self.state != TournamentState::CheckIn {
            return Err(TournamentError::StateConflict);
        }
        if !self.registered.contains(&player) {
            return Err(TournamentError::NotRegistered);
        }
        self.checked_in.insert(player);
        Ok(())
    }

    fn start(&mut self, rng: &mut impl Rng) -> Result<Vec<TournamentEvent>, TournamentError> {
        if self.state != TournamentState::CheckIn {
            return Err(TournamentError::StateConflict);
        }
        let participants: Vec<PlayerId> = self
            .registered
            .iter()
            .filter(|p| self.checked_in.contains(p))
            .copied()
            .collect();
        if participants.len() < self.config.min_participants {
            self.state = TournamentState::Cancelled;
            return Err(TournamentError::InsufficientParticipants);
        }

        self.state = TournamentState::BracketGeneration;
        let mut events = Vec::new();
        match self.config.format {
            TournamentFormat::SingleElimination => {
                self.bracket = Some(build_single_elimination(&participants));
            }
            TournamentFormat::DoubleElimination => {
                self.bracket = Some(build_double_elimination(&participants));
            }
            TournamentFormat::RoundRobin => {
                self.rr_schedule = round_robin_schedule(participants.len());
                for &p in &participants {
                    self.rr_wins.insert(p, 0);
                }
                self.registered = participants.clone();
            }
            TournamentFormat::Swiss => {
                for &p in &participants {
                    self.swiss_scores.insert(p, 0.0);
                }
                let standings: Vec<(PlayerId, f64)> = participants.iter().map(|&p| (p, 0.0)).collect();
                self.swiss_active = swiss_pairing(&standings, &self.swiss_played, rng);
                for &(a, b) in &self.swiss_active {
                    self.swiss_played.insert(pair_key(a, b));
                }
            }
        }
        self.state = TournamentState::InProgress;
        events.push(TournamentEvent::BracketGenerated {
            tournament: self.id,
            participants: participants.len(),
        });
        Ok(events)
    }

    fn ready_matches(&self) -> Vec<(PlayerId, PlayerId, Pending)> {
        match self.config.format {
            TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination => {
                let Some(bracket) = &self.bracket else { return Vec::new() };
                bracket
                    .graph
                    .node_indices()
                    .filter(|&n| bracket.graph[n].is_ready() && !self.is_node_dispatched(n))
                    .filter_map(|n| {
                        let (a, b) = bracket.graph[n].participants();
                        Some((a?, b?, Pending::Bracket(n)))
                    })
                    .collect()
            }
            TournamentFormat::RoundRobin => {
                let Some(round) = self.rr_schedule.get(self.rr_current_round) else {
                    return Vec::new();
                };
                round
                    .iter()
                    .filter(|&&(a, b)| !self.is_rr_dispatched(a, b))
                    .map(|&(a, b)| {
                        let pa = self.registered[a];
                        let pb = self.registered[b];
                        (pa, pb, Pending::RoundRobin { a: pa, b: pb })
                    })
                    .collect()
            }
            TournamentFormat::Swiss => self
                .swiss_active
                .iter()
                .filter(|&&(a, b)| !self.is_swiss_dispatched(a, b))
                .map(|&(a, b)| (a, b, Pending::Swiss { a, b }))
                .collect(),
        }
    }

    fn is_node_dispatched(&self, node: NodeIndex) -> bool {
        self.dispatched
            .values()
            .any(|p| matches!(p, Pending::Bracket(n) if *n == node))
    }

    fn is_rr_dispatched(&self, a_idx: usize, b_idx: usize) -> bool {
        let a = self.registered[a_idx];
        let b = self.registered[b_idx];
        self.dispatched
            .values()
            .any(|p| matches!(p, Pending::RoundRobin { a: x, b: y } if (*x, *y) == (a, b) || (*x, *y) == (b, a)))
    }

    fn is_swiss_dispatched(&self, a: PlayerId, b: PlayerId) -> bool {
        self.dispatched
            .values()
            .any(|p| matches!(p, Pending::Swiss { a: x, b: y } if (*x, *y) == (a, b) || (*x, *y) == (b, a)))
    }

    fn dispatch(&mut self, arena_match_id: MatchId, pending: Pending) {
        self.dispatched.insert(arena_match_id, pending);
    }

    fn report_result(
        &mut self,
        arena_match_id: MatchId,
        winner: PlayerId,
    ) -> Result<Vec<TournamentEvent>, TournamentError> {
        let Some(pending) = self.dispatched.remove(&arena_match_id) else {
            return Err(TournamentError::UnknownMatch);
        };
        let mut events = Vec::new();
        match pending {
            Pending::Bracket(node) => {
                let Some(bracket) = &mut self.bracket else {
                    return Err(TournamentError::UnknownMatch);
                };
                let (a, b) = bracket.graph[node].participants();
                let loser = match (a, b) {
                    (Some(a), Some(b)) if a == winner => b,
                    (Some(a), Some(b)) if b == winner => a,
                    _ => return Err(TournamentError::UnknownMatch),
                };
                record_result(&mut bracket.graph, node, winner, loser);
                if bracket.graph[bracket.champion_node].winner.is_some() {
                    self.champion = bracket.graph[bracket.champion_node].winner;
                    self.state = TournamentState::Completed;
                    events.push(self.completion_event());
                }
            }
            Pending::RoundRobin { .. } => {
                *self.rr_wins.entry(winner).or_insert(0) += 1;
                let round_done = self
                    .rr_schedule
                    .get(self.rr_current_round)
                    .map(|round| {
                        round.iter().all(|&(i, j)| {
                            let pa = self.registered[i];
                            let pb = self.registered[j];
                            !self.dispatched.values().any(
                                |p| matches!(p, Pending::RoundRobin { a: x, b: y } if (*x,*y)==(pa,pb) || (*x,*y)==(pb,pa)),
                            )
                        })
                    })
                    .unwrap_or(true);
                if round_done {
                    self.rr_current_round += 1;
                    if self.rr_current_round >= self.rr_schedule.len() {
                        self.state = TournamentState::Completed;
                        self.champion = self.rr_wins.iter().max_by_key(|(_, &w)| w).map(|(&p, _)| p);
                        events.push(self.completion_event());
                    } else {
                        events.push(TournamentEvent::RoundAdvanced {
                            tournament: self.id,
                            round: self.rr_current_round as u32,
                        });
                    }
                }
            }
            Pending::Swiss { a, b } => {
                let delta = if winner == a { 1.0 } else { 0.0 };
                *self.swiss_scores.entry(a).or_insert(0.0) += delta;
                *self.swiss_scores.entry(b).or_insert(0.0) += 1.0 - delta;
                self.swiss_active.retain(|&(x, y)| (x, y) != (a, b));
                if self.swiss_active.is_empty() {
                    self.swiss_round += 1;
                    if self.swiss_round >= self.config.swiss_rounds {
                        self.state = TournamentState::Completed;
                        self.champion = self
                            .swiss_scores
                            .iter()
                            .max_by(|(_, s1), (_, s2)| s1.partial_cmp(s2).unwrap())
                            .map(|(&p, _)| p);
                        events.push(self.completion_event());
                    } else {
                        events.push(TournamentEvent::RoundAdvanced {
                            tournament: self.id,
                            round: self.swiss_round,
                        });
                    }
                }
            }
        }
        Ok(events)
    }

    fn completion_event(&self) -> TournamentEvent {
        TournamentEvent::Completed {
            tournament: self.id,
            champion: self.champion,
            prize_pool: self.prize_payouts(),
        }
    }

    fn prize_payouts(&self) -> Vec<(PlayerId, u64)> {
        let standings = self.standings();
        self.config
            .prize_distribution
            .0
            .iter()
            .filter_map(|&(place, fraction)| {
                standings
                    .get(place as usize - 1)
                    .map(|&(player, _)| (player, (self.config.prize_pool as f64 * fraction) as u64))
            })
            .collect()
    }

    /// Auto-advances the registration/check-in phases once their deadline
    /// has passed. Registration opens check-in; check-in either starts the
    /// tournament (reusing `start`, which already walks through bracket
    /// generation) or cancels it for lack of participants.
    fn tick(&mut self, now: DateTime<Utc>, rng: &mut impl Rng) -> Vec<TournamentEvent> {
        match self.state {
            TournamentState::Registration if now >= self.phase_deadline => {
                let _ = self.open_check_in(now);
                Vec::new()
            }
            TournamentState::CheckIn if now >= self.phase_deadline => match self.start(rng) {
                Ok(events) => events,
                Err(_) => vec![TournamentEvent::Cancelled { tournament: self.id }],
            },
            _ => Vec::new(),
        }
    }

    /// Current standings as (player, score) ordered best-first. `score`
    /// means wins for round-robin/Swiss and bracket depth for elimination
    /// formats (the champion always sorts first).
    pub fn standings(&self) -> Vec<(PlayerId, f64)> {
        match self.config.format {
            TournamentFormat::SingleElimination | TournamentFormat::DoubleElimination => {
                let Some(bracket) = &self.bracket else { return Vec::new() };
                let mut depth: HashMap<PlayerId, u32> = HashMap::new();
                for node in bracket.graph.node_indices() {
                    let m = &bracket.graph[node];
                    if let (Some(a), Some(b)) = m.participants() {
                        depth.entry(a).or_insert(0);
                        depth.entry(b).or_insert(0);
                        if let Some(w) = m.winner {
                            let entry = depth.entry(w).or_insert(0);
                            *entry = (*entry).max(m.round);
                        }
                    }
                }
                let mut rows: Vec<(PlayerId, f64)> = depth.into_iter().map(|(p, d)| (p, d as f64)).collect();
                rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
                rows
            }
            TournamentFormat::RoundRobin => {
                let mut rows: Vec<(PlayerId, f64)> =
                    self.rr_wins.iter().map(|(&p, &w)| (p, w as f64)).collect();
                rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
                rows
            }
            TournamentFormat::Swiss => {
                let mut rows: Vec<(PlayerId, f64)> =
                    self.swiss_scores.iter().map(|(&p, &s)| (p, s)).collect();
                rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
                rows
            }
        }
    }
}

fn pair_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a.0 < b.0 {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct TournamentEngine {
    tournaments: HashMap<TournamentId, Tournament>,
    events: EventBus<TournamentEvent>,
    rng: StdRng,
}

impl TournamentEngine {
    pub fn new() -> Self {
        Self {
            tournaments: HashMap::new(),
            events: EventBus::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn events(&self) -> &EventBus<TournamentEvent> {
        &self.events
    }

    pub fn create(&mut self, config: TournamentConfig, now: DateTime<Utc>) -> TournamentId {
        let id = TournamentId::new();
        self.tournaments.insert(id, Tournament::new(id, config, now));
        id
    }

    pub fn register(&mut self, id: TournamentId, player: PlayerId) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        t.register(player)?;
        self.events.publish(TournamentEvent::Registered { tournament: id, player });
        Ok(())
    }

    pub fn open_check_in(&mut self, id: TournamentId, now: DateTime<Utc>) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        t.open_check_in(now)
    }

    pub fn check_in(&mut self, id: TournamentId, player: PlayerId) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        t.check_in(player)?;
        self.events.publish(TournamentEvent::CheckedIn { tournament: id, player });
        Ok(())
    }

    pub fn start(&mut self, id: TournamentId, rng: &mut impl Rng) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        let events = match t.start(rng) {
            Ok(events) => events,
            Err(err @ TournamentError::InsufficientParticipants) => {
                self.events.publish(TournamentEvent::Cancelled { tournament: id });
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        for e in events {
            self.events.publish(e);
        }
        let ready: Vec<(PlayerId, PlayerId)> = t.ready_matches().into_iter().map(|(a, b, _)| (a, b)).collect();
        for (a, b) in ready {
            self.events.publish(TournamentEvent::MatchReady {
                tournament: id,
                player_a: a,
                player_b: b,
            });
        }
        Ok(())
    }

    /// Drives every non-terminal tournament's registration/check-in clock,
    /// auto-starting (or cancelling) those whose check-in window has
    /// elapsed. Mirrors `start`'s event sequencing for anything it
    /// transitions through.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let ids: Vec<TournamentId> = self
            .tournaments
            .iter()
            .filter(|(_, t)| !t.state.is_terminal())
            .map(|(&id, _)| id)
            .collect();

        for id in ids {
            let t = self.tournaments.get_mut(&id).unwrap();
            let events = t.tick(now, &mut self.rng);
            for e in events {
                self.events.publish(e);
            }
            let ready: Vec<(PlayerId, PlayerId)> = t.ready_matches().into_iter().map(|(a, b, _)| (a, b)).collect();
            for (a, b) in ready {
                self.events.publish(TournamentEvent::MatchReady {
                    tournament: id,
                    player_a: a,
                    player_b: b,
                });
            }
        }
    }

    /// Players waiting to be matched into an arena instance right now.
    pub fn ready_matches(&self, id: TournamentId) -> Vec<(PlayerId, PlayerId)> {
        self.tournaments
            .get(&id)
            .map(|t| t.ready_matches().into_iter().map(|(a, b, _)| (a, b)).collect())
            .unwrap_or_default()
    }

    /// Correlates a freshly created arena match with the tournament slot it fills.
    pub fn dispatch(
        &mut self,
        id: TournamentId,
        player_a: PlayerId,
        player_b: PlayerId,
        arena_match_id: MatchId,
    ) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        let pending = t
            .ready_matches()
            .into_iter()
            .find(|(a, b, _)| (*a, *b) == (player_a, player_b) || (*a, *b) == (player_b, player_a))
            .map(|(_, _, p)| p)
            .ok_or(TournamentError::UnknownMatch)?;
        t.dispatch(arena_match_id, pending);
        Ok(())
    }

    pub fn report_result(
        &mut self,
        id: TournamentId,
        arena_match_id: MatchId,
        winner: PlayerId,
    ) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        let events = t.report_result(arena_match_id, winner)?;
        for e in events {
            self.events.publish(e);
        }
        let ready: Vec<(PlayerId, PlayerId)> = t.ready_matches().into_iter().map(|(a, b, _)| (a, b)).collect();
        for (a, b) in ready {
            self.events.publish(TournamentEvent::MatchReady {
                tournament: id,
                player_a: a,
                player_b: b,
            });
        }
        Ok(())
    }

    pub fn cancel(&mut self, id: TournamentId) -> Result<(), TournamentError> {
        let t = self.tournaments.get_mut(&id).ok_or(TournamentError::UnknownTournament(id))?;
        if t.state.is_terminal() {
            return Err(TournamentError::StateConflict);
        }
        t.state = TournamentState::Cancelled;
        self.events.publish(TournamentEvent::Cancelled { tournament: id });
        Ok(())
    }

    pub fn standings(&self, id: TournamentId) -> Vec<(PlayerId, f64)> {
        self.tournaments.get(&id).map(|t| t.standings()).unwrap_or_default()
    }

    pub fn state(&self, id: TournamentId) -> Option<TournamentState> {
        self.tournaments.get(&id).map(|t| t.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn players(n: usize) -> Vec<PlayerId> {
        (1..=n as u64).map(PlayerId).collect()
    }

    #[test]
    fn single_elimination_runs_to_completion() {
        let mut engine = TournamentEngine::new();
        let id = engine.create(TournamentConfig::single_elimination("ranked_1v1", 8, 1000), Utc::now());
        for p in players(8) {
            engine.register(id, p).unwrap();
        }
        engine.open_check_in(id, Utc::now()).unwrap();
        for p in players(8) {
            engine.check_in(id, p).unwrap();
        }
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        engine.start(id, &mut rng).unwrap();

        let mut guard = 0;
        while engine.state(id) != Some(TournamentState::Completed) && guard < 50 {
            let ready = engine.ready_matches(id);
            for (a, b) in ready {
                let match_id = MatchId::new();
                engine.dispatch(id, a, b, match_id).unwrap();
                let winner = if a.0 < b.0 { a } else { b };
                engine.report_result(id, match_id, winner).unwrap();
            }
            guard += 1;
        }
        assert_eq!(engine.state(id), Some(TournamentState::Completed));
        assert_eq!(engine.standings(id).first().map(|(p, _)| *p), Some(PlayerId(1)));
    }

    #[test]
    fn round_robin_visits_every_pair() {
        let mut engine = TournamentEngine::new();
        let id = engine.create(TournamentConfig::round_robin("ranked_1v1", 4, 0), Utc::now());
        for p in players(4) {
            engine.register(id, p).unwrap();
        }
        engine.open_check_in(id, Utc::now()).unwrap();
        for p in players(4) {
            engine.check_in(id, p).unwrap();
        }
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        engine.start(id, &mut rng).unwrap();

        let mut guard = 0;
        while engine.state(id) != Some(TournamentState::Completed) && guard < 50 {
            let ready = engine.ready_matches(id);
            if ready.is_empty() {
                break;
            }
            for (a, b) in ready {
                let match_id = MatchId::new();
                engine.dispatch(id, a, b, match_id).unwrap();
                engine.report_result(id, match_id, a).unwrap();
            }
            guard += 1;
        }
        assert_eq!(engine.state(id), Some(TournamentState::Completed));
    }

    #[test]
    fn insufficient_participants_blocks_start() {
        let mut engine = TournamentEngine::new();
        let id = engine.create(TournamentConfig::single_elimination("ranked_1v1", 8, 0), Utc::now());
        engine.register(id, PlayerId(1)).unwrap();
        engine.open_check_in(id, Utc::now()).unwrap();
        engine.check_in(id, PlayerId(1)).unwrap();
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            engine.start(id, &mut rng),
            Err(TournamentError::InsufficientParticipants)
        ));
    }
}
