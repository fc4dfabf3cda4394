use std::collections::HashMap;
use std::time::Instant;

use arena::{ArenaRuntime, MatchConfig as ArenaMatchConfig};
use chrono::{DateTime, Utc};
use common::ids::{Faction, GuildId, MatchId, PlayerId, TournamentId, WarId};
use guildwar::{GuildWarEngine, GuildWarEvent, WarConfig};
use leaderboard::{LeaderboardConfig, LeaderboardStore};
use matchmaking::{Matchmaker, MatchmakingEvent};
use rating::{RatingConfig, RatingEngine, RatingEvent};
use tokio::sync::broadcast;
use tournament::{TournamentConfig, TournamentEngine, TournamentEvent};
use tracing::{info, warn};
use worldpvp::{WorldPvpConfig, WorldPvpRuntime, ZoneConfig};

use crate::error::DispatchError;
use crate::modes::ModeDef;
use crate::rewards::{tier_up_bonus, RewardQueue, RewardTask};
use crate::teleports::TeleportQueue;

/// Owns every competitive component and advances them in the fixed order:
/// matchmaker, arena, tournament, open-world pvp, guild wars, then the
/// scheduled rating decay and leaderboard refresh. Cross-component handoffs
/// flow through each component's own event bus, drained here rather than
/// locked against from another thread.
pub struct Dispatcher {
    matchmaker: Matchmaker,
    arena: ArenaRuntime,
    tournaments: TournamentEngine,
    worldpvp: WorldPvpRuntime,
    guildwar: GuildWarEngine,
    rating: RatingEngine,
    leaderboard: LeaderboardStore,

    modes: HashMap<String, ModeDef>,
    tournament_modes: HashMap<TournamentId, String>,
    tournament_arena_matches: HashMap<MatchId, TournamentId>,
    rewards: RewardQueue,
    teleports: TeleportQueue,

    // Subscribed once, at construction, so no event published by a tick is
    // ever lost to a receiver that hasn't been created yet. `broadcast`
    // receivers only see sends that happen after they subscribe.
    matchmaker_rx: broadcast::Receiver<MatchmakingEvent>,
    arena_rx: broadcast::Receiver<arena::ArenaEvent>,
    tournament_rx: broadcast::Receiver<TournamentEvent>,
    rating_rx: broadcast::Receiver<RatingEvent>,
    guildwar_rx: broadcast::Receiver<GuildWarEvent>,

    match_sweep_after: std::time::Duration,
    last_decay_check: Option<DateTime<Utc>>,
    decay_check_interval: chrono::Duration,
}

impl Dispatcher {
    pub fn new(match_sweep_after: std::time::Duration, decay_check_interval: std::time::Duration) -> Self {
        let matchmaker = Matchmaker::new();
        let arena = ArenaRuntime::new();
        let tournaments = TournamentEngine::new();
        let rating = RatingEngine::new(RatingConfig::default());
        let guildwar = GuildWarEngine::new();

        let matchmaker_rx = matchmaker.events().subscribe();
        let arena_rx = arena.events().subscribe();
        let tournament_rx = tournaments.events().subscribe();
        let rating_rx = rating.events().subscribe();
        let guildwar_rx = guildwar.events().subscribe();

        Self {
            matchmaker,
            arena,
            tournaments,
            worldpvp: WorldPvpRuntime::new(WorldPvpConfig::default()),
            guildwar,
            rating,
            leaderboard: LeaderboardStore::new(LeaderboardConfig::default()),
            modes: HashMap::new(),
            tournament_modes: HashMap::new(),
            tournament_arena_matches: HashMap::new(),
            rewards: RewardQueue::new(),
            teleports: TeleportQueue::new(),
            matchmaker_rx,
            arena_rx,
            tournament_rx,
            rating_rx,
            guildwar_rx,
            match_sweep_after,
            last_decay_check: None,
            decay_check_interval: chrono::Duration::from_std(decay_check_interval)
                .unwrap_or_else(|_| chrono::Duration::hours(24)),
        }
    }

    /// Registers a competitive mode with every component that needs to know
    /// about it, then wires up its matchmaking queue.
    pub fn register_mode(&mut self, mode: ModeDef) {
        self.matchmaker.register_mode(&mode.name, mode.queue.clone());
        self.modes.insert(mode.name.clone(), mode);
    }

    pub fn with_default_modes() -> Self {
        let mut d = Self::new(std::time::Duration::from_secs(600), std::time::Duration::from_secs(24 * 3600));
        d.register_mode(ModeDef::arena_1v1());
        d.register_mode(ModeDef::arena_3v3());
        d
    }

    // ---- pass-through APIs -------------------------------------------------

    pub fn enqueue(
        &mut self,
        player: PlayerId,
        mode: &str,
        rating: i32,
        region: &str,
        ping_ms: u32,
        now: Instant,
    ) -> Result<(), DispatchError> {
        Ok(self.matchmaker.enqueue(player, mode, rating, region, ping_ms, now)?)
    }

    pub fn leave_queue(&mut self, player: PlayerId, mode: &str) -> Result<(), DispatchError> {
        Ok(self.matchmaker.leave(player, mode)?)
    }

    pub fn arena_match(&self, id: MatchId) -> Option<&arena::ArenaMatch> {
        self.arena.get(id)
    }

    /// Finds the non-terminal match a player is currently seated in, if any.
    pub fn active_arena_match_for(&self, player: PlayerId) -> Option<MatchId> {
        self.arena
            .matches()
            .find(|m| !m.state.is_terminal() && m.players.contains_key(&player))
            .map(|m| m.id)
    }

    /// Records a kill inside a running arena match, used by the game server
    /// layer that owns combat resolution; the coordinator only scores it.
    pub fn record_arena_kill(
        &mut self,
        match_id: MatchId,
        killer: PlayerId,
        victim: PlayerId,
        assister: Option<PlayerId>,
        now: Instant,
    ) -> Result<(), DispatchError> {
        let m = self.arena.get_mut(match_id).ok_or(arena::ArenaError::UnknownMatch(match_id))?;
        m.on_kill(killer, victim, assister, now);
        Ok(())
    }

    pub fn register_zone(&mut self, config: ZoneConfig) -> Result<(), DispatchError> {
        Ok(self.worldpvp.register_zone(config)?)
    }

    pub fn set_faction(&mut self, player: PlayerId, faction: Faction) {
        self.worldpvp.set_faction(player, faction);
    }

    pub fn can_attack(&self, a: PlayerId, b: PlayerId) -> bool {
        self.worldpvp.can_attack(a, b)
    }

    pub fn on_world_kill(&mut self, killer: PlayerId, victim: PlayerId, now: Instant) {
        let event = self.worldpvp.on_player_killed(killer, victim, now);
        info!(?event, "world pvp kill recorded");
    }

    pub fn declare_war(
        &mut self,
        config: WarConfig,
        guild_a: GuildId,
        guild_b: GuildId,
        now: Instant,
    ) -> Result<WarId, DispatchError> {
        Ok(self.guildwar.declare(config, guild_a, guild_b, Vec::new(), now)?)
    }

    pub fn accept_war(&mut self, war: WarId, now: Instant) -> Result<(), DispatchError> {
        Ok(self.guildwar.accept(war, now)?)
    }

    pub fn join_war(&mut self, war: WarId, player: PlayerId, guild: GuildId) -> Result<(), DispatchError> {
        Ok(self.guildwar.join(war, player, guild)?)
    }

    /// Creates a tournament and remembers which mode its matches should be
    /// seeded and scored under — `TournamentEngine` itself has no external
    /// getter for this, so the dispatcher is the source of truth.
    pub fn create_tournament(&mut self, config: TournamentConfig, now: DateTime<Utc>) -> TournamentId {
        let mode = config.mode.clone();
        let id = self.tournaments.create(config, now);
        self.tournament_modes.insert(id, mode);
        id
    }

    pub fn register_for_tournament(&mut self, id: TournamentId, player: PlayerId) -> Result<(), DispatchError> {
        Ok(self.tournaments.register(id, player)?)
    }

    pub fn start_tournament(&mut self, id: TournamentId, rng: &mut impl rand::Rng) -> Result<(), DispatchError> {
        Ok(self.tournaments.start(id, rng)?)
    }

    pub fn rating(&self) -> &RatingEngine {
        &self.rating
    }

    pub fn leaderboard(&mut self) -> &mut LeaderboardStore {
        &mut self.leaderboard
    }

    pub fn pending_reward_count(&self) -> usize {
        self.rewards.len()
    }

    pub async fn flush_rewards(&mut self, grants: &dyn common::collaborators::RewardGrants) {
        self.rewards.flush(grants).await;
    }

    pub fn pending_teleport_count(&self) -> usize {
        self.teleports.len()
    }

    pub async fn flush_teleports(&mut self, world: &dyn common::collaborators::WorldInterface) {
        self.teleports.flush(world).await;
    }

    // ---- tick ---------------------------------------------------------------

    /// One cooperative step. `now` anchors interval/timeout math, `wall_now`
    /// anchors schedule-based work (decay, seasons). Components are advanced
    /// in the order fixed by the coordination contract: matchmaker, arena,
    /// tournament, world pvp, guild wars, then scheduled rating decay.
    pub fn tick(&mut self, now: Instant, wall_now: DateTime<Utc>) {
        self.tick_matchmaking(now);
        self.tick_arena(now, wall_now);
        self.tick_tournaments(now, wall_now);
        self.tick_worldpvp(now);
        self.tick_guildwar(now);
        self.tick_rating_decay(wall_now);
        self.arena.sweep_finished(now, self.match_sweep_after);
    }

    fn tick_matchmaking(&mut self, now: Instant) {
        self.matchmaker.tick(now);
        while let Ok(event) = self.matchmaker_rx.try_recv() {
            match event {
                MatchmakingEvent::MatchFound { mode, teams, quality } => {
                    self.start_arena_match(&mode, teams, now);
                    info!(mode, quality, "queue popped into an arena match");
                }
                MatchmakingEvent::QueueTimeout { mode, player } => {
                    warn!(mode, %player, "player timed out of queue");
                }
            }
        }
    }

    fn start_arena_match(&mut self, mode: &str, teams: Vec<Vec<PlayerId>>, now: Instant) -> Option<MatchId> {
        let config = self.modes.get(mode)?.arena.clone();
        Some(self.spawn_arena_match(config, teams, now))
    }

    fn spawn_arena_match(&mut self, config: ArenaMatchConfig, teams: Vec<Vec<PlayerId>>, now: Instant) -> MatchId {
        let id = self.arena.create(config, now);
        for (team_idx, roster) in teams.into_iter().enumerate() {
            for player in roster {
                if let Err(err) = self.arena.add_player(id, player, team_idx as u8) {
                    warn!(%err, %player, "failed to seat player in new arena match");
                }
            }
        }
        if let Err(err) = self.arena.start_countdown(id, now) {
            warn!(%err, match_id = %id, "failed to start arena match countdown");
        }
        id
    }

    fn tick_arena(&mut self, now: Instant, wall_now: DateTime<Utc>) {
        self.arena.tick(now);
        while let Ok(event) = self.arena_rx.try_recv() {
            match event {
                arena::ArenaEvent::MatchStarted { match_id } => {
                    info!(match_id = %match_id, "arena match started");
                }
                arena::ArenaEvent::SuddenDeathStarted { match_id } => {
                    info!(match_id = %match_id, "arena match entered sudden death");
                }
                arena::ArenaEvent::MatchFinished(result) => {
                    self.settle_arena_match(&result, wall_now);
                    if let Some(tournament_id) = self.tournament_arena_matches.remove(&result.match_id) {
                        self.report_tournament_result(tournament_id, &result);
                    }
                }
                arena::ArenaEvent::MatchAbandoned { match_id } => {
                    if let Some(tournament_id) = self.tournament_arena_matches.remove(&match_id) {
                        self.forfeit_tournament_match(tournament_id, match_id);
                    }
                }
            }
        }
    }

    fn settle_arena_match(&mut self, result: &arena::MatchResult, wall_now: DateTime<Utc>) {
        let Some(m) = self.arena.get(result.match_id) else { return };
        let mode = m.config.mode.clone();

        if result.teams.len() != 2 {
            warn!(match_id = %result.match_id, "rating only supports two-team results, skipping");
            return;
        }
        let (team_a, team_b) = (result.teams[0].clone(), result.teams[1].clone());

        let changes = if result.is_draw {
            self.rating.submit_draw(&mode, &team_a, &team_b, wall_now)
        } else {
            match result.winner {
                Some(0) => self.rating.submit_result(&mode, &team_a, &team_b, wall_now),
                Some(1) => self.rating.submit_result(&mode, &team_b, &team_a, wall_now),
                _ => return,
            }
        };

        let changes = match changes {
            Ok(changes) => changes,
            Err(err) => {
                warn!(%err, match_id = %result.match_id, "rating submission failed");
                return;
            }
        };

        for change in &changes {
            let won = result.winner.map(|w| {
                let team_idx = if team_a.contains(&change.player) { 0 } else { 1 };
                team_idx == w as usize
            });
            let record = self.rating.record(change.player, &mode);
            self.leaderboard.record_match_result(
                &mode,
                change.player,
                record.rating,
                self.rating.tier(change.player, &mode),
                record.wins,
                record.losses,
                record.matches,
                won,
            );
        }

        self.drain_tier_promotions(&mode);
    }

    fn drain_tier_promotions(&mut self, mode: &str) {
        while let Ok(event) = self.rating_rx.try_recv() {
            if let RatingEvent::TierChanged { mode: m, player, new_tier, .. } = event {
                if m == mode {
                    let bonus = tier_up_bonus(new_tier);
                    if bonus > 0 {
                        self.rewards.push(RewardTask::Currency {
                            player,
                            currency: "honor_token".into(),
                            amount: bonus,
                        });
                    }
                }
            }
        }
    }

    fn report_tournament_result(&mut self, tournament_id: TournamentId, result: &arena::MatchResult) {
        let Some(winner_team) = result.winner else {
            warn!(match_id = %result.match_id, "tournament match ended in a draw, no winner to report");
            return;
        };
        let Some(winner) = result.teams.get(winner_team as usize).and_then(|t| t.first()) else {
            return;
        };
        if let Err(err) = self.tournaments.report_result(tournament_id, result.match_id, *winner) {
            warn!(%err, tournament = %tournament_id, "failed to report tournament result");
        }
    }

    fn forfeit_tournament_match(&mut self, tournament_id: TournamentId, match_id: MatchId) {
        let Some(m) = self.arena.get(match_id) else { return };
        let mut scores: Vec<(u8, u32)> = m.team_scores.iter().map(|(&t, &s)| (t, s)).collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));
        let winning_team = scores.first().map(|(t, _)| *t).unwrap_or(0);
        let Some(winner) = m.players.values().find(|p| p.team == winning_team).map(|p| p.player) else {
            return;
        };
        if let Err(err) = self.tournaments.report_result(tournament_id, match_id, winner) {
            warn!(%err, tournament = %tournament_id, "failed to forfeit abandoned tournament match");
        }
    }

    fn tick_tournaments(&mut self, now: Instant, wall_now: DateTime<Utc>) {
        self.tournaments.tick(wall_now);
        while let Ok(event) = self.tournament_rx.try_recv() {
            match event {
                TournamentEvent::MatchReady { tournament, player_a, player_b } => {
                    self.dispatch_tournament_match(tournament, player_a, player_b, now);
                }
                TournamentEvent::Completed { tournament, champion, .. } => {
                    self.tournament_modes.remove(&tournament);
                    info!(tournament = %tournament, ?champion, "tournament completed");
                }
                TournamentEvent::Cancelled { tournament } => {
                    self.tournament_modes.remove(&tournament);
                }
                _ => {}
            }
        }
    }

    fn dispatch_tournament_match(
        &mut self,
        tournament: TournamentId,
        player_a: PlayerId,
        player_b: PlayerId,
        now: Instant,
    ) {
        let Some(mode_name) = self.tournament_modes.get(&tournament).cloned() else {
            warn!(tournament = %tournament, "tournament has no registered mode, cannot dispatch match");
            return;
        };
        let Some(arena_config) = self.modes.get(&mode_name).map(|m| m.arena.clone()) else {
            warn!(tournament = %tournament, mode = mode_name, "unknown mode for tournament");
            return;
        };
        let match_id = self.spawn_arena_match(arena_config, vec![vec![player_a], vec![player_b]], now);
        if let Err(err) = self.tournaments.dispatch(tournament, player_a, player_b, match_id) {
            warn!(%err, tournament = %tournament, "failed to correlate tournament match");
            return;
        }
        self.tournament_arena_matches.insert(match_id, tournament);
    }

    fn tick_worldpvp(&mut self, now: Instant) {
        let events = self.worldpvp.tick(now);
        for event in events {
            if let worldpvp::WorldPvpEvent::ZoneCaptured { zone, new_controller } = event {
                info!(zone = %zone, ?new_controller, "world pvp zone captured");
            }
        }
    }

    fn tick_guildwar(&mut self, now: Instant) {
        let outcomes = self.guildwar.tick(now);

        // Preparation -> Active only ever shows up as a `WarStarted` event,
        // never as an outcome below, so instanced entry has to be picked up
        // off the event bus rather than off `guildwar.tick`'s return value.
        while let Ok(event) = self.guildwar_rx.try_recv() {
            if let GuildWarEvent::WarStarted { war } = event {
                if let Some(w) = self.guildwar.war(war) {
                    if w.is_instanced() {
                        let (a, b) = w.participants();
                        for &player in a.iter().chain(b.iter()) {
                            self.teleports.queue_enter(player);
                        }
                    }
                }
            }
        }

        for outcome in outcomes {
            let instanced = self.guildwar.war(outcome.war).map(|w| w.is_instanced()).unwrap_or(false);
            if instanced {
                for &player in outcome.participants_a.iter().chain(outcome.participants_b.iter()) {
                    self.teleports.queue_exit(player);
                }
            }

            if let Some(winner) = outcome.winner {
                if let Some(war) = self.guildwar.war(outcome.war) {
                    let victors = if winner == war.guild_a {
                        &outcome.participants_a
                    } else {
                        &outcome.participants_b
                    };
                    for &player in victors {
                        self.rewards.push(RewardTask::Title {
                            player,
                            title: "guild_war_victor".into(),
                        });
                    }
                }
            }
            info!(war = %outcome.war, winner = ?outcome.winner, "guild war concluded");
        }
    }

    fn tick_rating_decay(&mut self, wall_now: DateTime<Utc>) {
        let due = match self.last_decay_check {
            None => true,
            Some(last) => wall_now - last >= self.decay_check_interval,
        };
        if due {
            self.rating.apply_decay(wall_now);
            self.last_decay_check = Some(wall_now);
        }
    }
}
