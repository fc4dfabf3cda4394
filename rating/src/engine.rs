use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::events::EventBus;
use common::ids::PlayerId;
use tracing::info;

use crate::elo::{rating_delta, KFactorSchedule, Outcome};
use crate::error::RatingError;
use crate::events::RatingEvent;
use crate::tier::{decay_policy_for, tier_of, Tier};

pub const DEFAULT_RATING: i32 = 1500;

#[derive(Debug, Clone)]
pub struct RatingRecord {
    pub rating: i32,
    pub peak_rating: i32,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub last_match_at: Option<DateTime<Utc>>,
}

impl Default for RatingRecord {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            peak_rating: DEFAULT_RATING,
            matches: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            last_match_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RatingChange {
    pub player: PlayerId,
    pub delta: i32,
    pub new_rating: i32,
}

#[derive(Debug, Clone)]
pub struct RatingConfig {
    pub k_factor: KFactorSchedule,
    /// Rating new seasons soft-reset toward.
    pub season_baseline: i32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: KFactorSchedule::default(),
            season_baseline: DEFAULT_RATING,
        }
    }
}

pub struct RatingEngine {
    config: RatingConfig,
    records: HashMap<(String, PlayerId), RatingRecord>,
    season: u32,
    events: EventBus<RatingEvent>,
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            season: 1,
            events: EventBus::default(),
        }
    }

    pub fn events(&self) -> &EventBus<RatingEvent> {
        &self.events
    }

    pub fn rating(&self, player: PlayerId, mode: &str) -> i32 {
        self.records
            .get(&(mode.to_string(), player))
            .map(|r| r.rating)
            .unwrap_or(DEFAULT_RATING)
    }

    pub fn tier(&self, player: PlayerId, mode: &str) -> Tier {
        tier_of(self.rating(player, mode))
    }

    pub fn record(&self, player: PlayerId, mode: &str) -> RatingRecord {
        self.records
            .get(&(mode.to_string(), player))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the highest-rated `n` players in `mode`. A thin convenience
    /// scan; the leaderboard component maintains the indexed, cached view
    /// used for paged reads.
    pub fn top(&self, mode: &str, n: usize) -> Vec<(PlayerId, i32)> {
        let mut rows: Vec<(PlayerId, i32)> = self
            .records
            .iter()
            .filter(|((m, _), _)| m == mode)
            .map(|((_, p), r)| (*p, r.rating))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        rows.truncate(n);
        rows
    }

    pub fn submit_result(
        &mut self,
        mode: &str,
        winners: &[PlayerId],
        losers: &[PlayerId],
        now: DateTime<Utc>,
    ) -> Result<Vec<RatingChange>, RatingError> {
        if winners.is_empty() || losers.is_empty() {
            return Err(RatingError::EmptyResult);
        }
        if winners.iter().any(|w| losers.contains(w)) {
            return Err(RatingError::OverlappingRoster);
        }

        let winner_avg = self.team_average(mode, winners);
        let loser_avg = self.team_average(mode, losers);

        let mut changes = Vec::with_capacity(winners.len() + losers.len());
        for &player in winners {
            changes.push(self.apply_delta(mode, player, loser_avg, Outcome::Win, now));
        }
        for &player in losers {
            changes.push(self.apply_delta(mode, player, winner_avg, Outcome::Loss, now));
        }
        Ok(changes)
    }

    pub fn submit_draw(
        &mut self,
        mode: &str,
        team_a: &[PlayerId],
        team_b: &[PlayerId],
        now: DateTime<Utc>,
    ) -> Result<Vec<RatingChange>, RatingError> {
        if team_a.is_empty() || team_b.is_empty() {
            return Err(RatingError::EmptyResult);
        }
        let a_avg = self.team_average(mode, team_a);
        let b_avg = self.team_average(mode, team_b);

        let mut changes = Vec::with_capacity(team_a.len() + team_b.len());
        for &player in team_a {
            changes.push(self.apply_delta(mode, player, b_avg, Outcome::Draw, now));
        }
        for &player in team_b {
            changes.push(self.apply_delta(mode, player, a_avg, Outcome::Draw, now));
        }
        Ok(changes)
    }

    fn team_average(&self, mode: &str, team: &[PlayerId]) -> i32 {
        let sum: i64 = team.iter().map(|&p| self.rating(p, mode) as i64).sum();
        (sum / team.len() as i64) as i32
    }

    fn apply_delta(
        &mut self,
        mode: &str,
        player: PlayerId,
        opponent_avg: i32,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> RatingChange {
        let key = (mode.to_string(), player);
        let record = self.records.entry(key).or_default();
        let k = self.config.k_factor.k_for(record.rating, record.matches);
        let delta = rating_delta(record.rating, opponent_avg, outcome, k);

        let old_tier = tier_of(record.rating);
        record.rating += delta;
        record.peak_rating = record.peak_rating.max(record.rating);
        record.matches += 1;
        match outcome {
            Outcome::Win => record.wins += 1,
            Outcome::Loss => record.losses += 1,
            Outcome::Draw => record.draws += 1,
        }
        record.last_match_at = Some(now);
        let new_tier = tier_of(record.rating);
        let new_rating = record.rating;

        self.events.publish(RatingEvent::ResultSubmitted {
            mode: mode.to_string(),
            player,
            delta,
            new_rating,
            at: now,
        });
        if new_tier != old_tier {
            self.events.publish(RatingEvent::TierChanged {
                mode: mode.to_string(),
                player,
                old_tier,
                new_tier,
            });
        }

        RatingChange { player, delta, new_rating }
    }

    /// Soft-resets every record toward the season baseline, preserving peak
    /// rating and clearing per-season match counters.
    pub fn start_season(&mut self, now: DateTime<Utc>) {
        self.season += 1;
        for record in self.records.values_mut() {
            record.rating = (record.rating + self.config.season_baseline) / 2;
            record.matches = 0;
            record.wins = 0;
            record.losses = 0;
            record.draws = 0;
        }
        info!(season = self.season, "rating season rolled over");
        self.events.publish(RatingEvent::SeasonStarted {
            season: self.season,
            at: now,
        });
    }

    pub fn current_season(&self) -> u32 {
        self.season
    }

    /// Scheduled decay pass, anchored to wall-clock `now`. Should be invoked
    /// at most once per real day, not once per tick.
    pub fn apply_decay(&mut self, now: DateTime<Utc>) {
        for ((mode, player), record) in self.records.iter_mut() {
            let Some(last) = record.last_match_at else { continue };
            let tier = tier_of(record.rating);
            let Some(policy) = decay_policy_for(tier) else { continue };

            let inactive_days = (now - last).num_days();
            if inactive_days < policy.inactive_days as i64 {
                continue;
            }

            let decayable_days = inactive_days - policy.inactive_days as i64 + 1;
            let loss = (decayable_days * policy.daily_rating_loss as i64) as i32;
            let floor = policy.floor;
            let new_rating = (record.rating - loss).max(floor);
            let amount = record.rating - new_rating;
            if amount <= 0 {
                continue;
            }
            record.rating = new_rating;
            self.events.publish(RatingEvent::DecayApplied {
                mode: mode.clone(),
                player: *player,
                amount,
                new_rating,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u64) -> PlayerId {
        PlayerId(n)
    }

    #[test]
    fn submit_result_is_zero_sum_for_1v1() {
        let mut engine = RatingEngine::new(RatingConfig {
            k_factor: KFactorSchedule::Flat(32),
            ..Default::default()
        });
        let now = Utc::now();
        let changes = engine
            .submit_result("arena_1v1", &[pid(1)], &[pid(2)], now)
            .unwrap();
        let winner = changes.iter().find(|c| c.player == pid(1)).unwrap();
        let loser = changes.iter().find(|c| c.player == pid(2)).unwrap();
        assert_eq!(winner.delta, -loser.delta);
    }

    #[test]
    fn overlapping_roster_rejected() {
        let mut engine = RatingEngine::new(RatingConfig::default());
        let err = engine
            .submit_result("arena_1v1", &[pid(1)], &[pid(1)], Utc::now())
            .unwrap_err();
        assert!(matches!(err, RatingError::OverlappingRoster));
    }

    #[test]
    fn decay_floors_at_tier_minimum() {
        let mut engine = RatingEngine::new(RatingConfig::default());
        let now = Utc::now();
        // Push player into Gold (decaying tier) via repeated wins against a much lower opponent.
        for _ in 0..20 {
            engine
                .submit_result("arena_1v1", &[pid(1)], &[pid(9)], now)
                .unwrap();
        }
        assert!(engine.rating(pid(1), "arena_1v1") >= 1400);

        let much_later = now + chrono::Duration::days(60);
        engine.apply_decay(much_later);
        assert!(engine.rating(pid(1), "arena_1v1") >= 1400);
    }

    #[test]
    fn season_rollover_preserves_peak_and_resets_counts() {
        let mut engine = RatingEngine::new(RatingConfig::default());
        let now = Utc::now();
        engine.submit_result("arena_1v1", &[pid(1)], &[pid(2)], now).unwrap();
        let peak_before = engine.record(pid(1), "arena_1v1").peak_rating;
        engine.start_season(now);
        let record = engine.record(pid(1), "arena_1v1");
        assert_eq!(record.matches, 0);
        assert_eq!(record.peak_rating, peak_before);
    }
}
