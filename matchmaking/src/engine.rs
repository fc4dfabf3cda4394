use std::collections::{HashMap, HashSet};
use std::time::Instant;

use common::events::EventBus;
use common::ids::PlayerId;
use tracing::{debug, info};

use crate::config::ModeConfig;
use crate::error::MatchmakingError;
use crate::events::MatchmakingEvent;
use crate::quality::{match_quality, snake_seed, Candidate};
use crate::queue::{compatible, ModeQueue, QueueEntry};

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueStatus {
    pub waiting: usize,
    pub avg_wait_secs: f64,
    pub est_wait_secs: f64,
}

pub struct Matchmaker {
    configs: HashMap<String, ModeConfig>,
    queues: HashMap<String, ModeQueue>,
    in_queue_or_match: HashSet<PlayerId>,
    events: EventBus<MatchmakingEvent>,
    matches_formed: u64,
    last_teams: Vec<Vec<PlayerId>>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
            queues: HashMap::new(),
            in_queue_or_match: HashSet::new(),
            events: EventBus::default(),
            matches_formed: 0,
            last_teams: Vec::new(),
        }
    }

    pub fn register_mode(&mut self, mode: &str, config: ModeConfig) {
        self.configs.insert(mode.to_string(), config);
        self.queues.entry(mode.to_string()).or_default();
    }

    pub fn events(&self) -> &EventBus<MatchmakingEvent> {
        &self.events
    }

    pub fn enqueue(
        &mut self,
        player: PlayerId,
        mode: &str,
        rating: i32,
        region: &str,
        ping_ms: u32,
        now: Instant,
    ) -> Result<(), MatchmakingError> {
        if !self.configs.contains_key(mode) {
            return Err(MatchmakingError::UnknownMode(mode.to_string()));
        }
        if self.in_queue_or_match.contains(&player) {
            return Err(MatchmakingError::AlreadyQueued(player));
        }

        let entry = QueueEntry::new(player, rating, region, ping_ms, now);
        self.queues.get_mut(mode).unwrap().push(entry);
        self.in_queue_or_match.insert(player);
        debug!(%player, mode, "player enqueued");
        Ok(())
    }

    pub fn leave(&mut self, player: PlayerId, mode: &str) -> Result<(), MatchmakingError> {
        let queue = self
            .queues
            .get_mut(mode)
            .ok_or_else(|| MatchmakingError::UnknownMode(mode.to_string()))?;
        if queue.remove(player).is_some() {
            self.in_queue_or_match.remove(&player);
            Ok(())
        } else {
            Err(MatchmakingError::NotQueued(player))
        }
    }

    pub fn status(&self, mode: &str, now: Instant) -> QueueStatus {
        let Some(queue) = self.queues.get(mode) else {
            return QueueStatus::default();
        };
        if queue.is_empty() {
            return QueueStatus::default();
        }
        let waits: Vec<f64> = queue
            .entries
            .iter()
            .map(|e| e.waited(now).as_secs_f64())
            .collect();
        let avg_wait_secs = waits.iter().sum::<f64>() / waits.len() as f64;
        let config = self.configs.get(mode);
        let est_wait_secs = config
            .map(|c| c.max_queue_time.as_secs_f64() / 2.0)
            .unwrap_or(0.0);
        QueueStatus {
            waiting: queue.len(),
            avg_wait_secs,
            est_wait_secs,
        }
    }

    /// Advances matching for every registered mode, evicting timed-out
    /// entries first, then attempting to form groups in FIFO order.
    pub fn tick(&mut self, now: Instant) {
        let modes: Vec<String> = self.configs.keys().cloned().collect();
        for mode in modes {
            self.evict_timeouts(&mode, now);
            self.form_matches(&mode, now);
        }
    }

    fn evict_timeouts(&mut self, mode: &str, now: Instant) {
        let config = self.configs.get(mode).cloned().expect("mode registered");
        let queue = self.queues.get_mut(mode).unwrap();
        let mut timed_out = Vec::new();
        queue.entries.retain(|entry| {
            if entry.waited(now) > config.max_queue_time {
                timed_out.push(entry.player);
                false
            } else {
                true
            }
        });
        for player in timed_out {
            self.in_queue_or_match.remove(&player);
            self.events.publish(MatchmakingEvent::QueueTimeout {
                mode: mode.to_string(),
                player,
            });
        }
    }

    /// Single forward pass: try each entry as an anchor in FIFO order.
    /// An anchor that fails to complete a group is not retried this tick.
    fn form_matches(&mut self, mode: &str, now: Instant) {
        let config = self.configs.get(mode).cloned().expect("mode registered");
        let group_size = config.group_size();

        loop {
            let queue = self.queues.get(mode).unwrap();
            let entries: Vec<QueueEntry> = queue.entries.iter().cloned().collect();
            let mut formed: Option<(Vec<PlayerId>, f64)> = None;

            'anchors: for anchor_idx in 0..entries.len() {
                let mut group_idx = vec![anchor_idx];
                for (j, candidate) in entries.iter().enumerate() {
                    if group_idx.len() == group_size {
                        break;
                    }
                    if j == anchor_idx {
                        continue;
                    }
                    let anchor = &entries[anchor_idx];
                    let all_compatible = group_idx
                        .iter()
                        .all(|&gi| compatible(&entries[gi], candidate, &config, now))
                        && compatible(anchor, candidate, &config, now);
                    if all_compatible {
                        group_idx.push(j);
                    }
                }

                if group_idx.len() < group_size {
                    continue 'anchors;
                }

                let candidates: Vec<Candidate> = group_idx
                    .iter()
                    .map(|&i| Candidate {
                        player: entries[i].player,
                        rating: entries[i].rating,
                        ping_ms: entries[i].ping_ms,
                        waited: entries[i].waited(now),
                    })
                    .collect();
                let teams = snake_seed(candidates, config.team_count);
                let quality = match_quality(&teams, &config);
                let oldest_wait = group_idx
                    .iter()
                    .map(|&i| entries[i].waited(now))
                    .max()
                    .unwrap_or_default();

                if quality < config.quality_threshold && oldest_wait < config.relaxation_wait {
                    continue 'anchors;
                }

                let players: Vec<PlayerId> = group_idx.iter().map(|&i| entries[i].player).collect();
                let team_ids: Vec<Vec<PlayerId>> = teams
                    .iter()
                    .map(|t| t.iter().map(|c| c.player).collect())
                    .collect();
                formed = Some((players, quality));
                self.last_teams = team_ids;
                break 'anchors;
            }

            let Some((players, quality)) = formed else { break };

            let queue = self.queues.get_mut(mode).unwrap();
            for player in &players {
                queue.remove(*player);
                self.in_queue_or_match.remove(player);
            }
            self.matches_formed += 1;
            let teams = std::mem::take(&mut self.last_teams);
            info!(mode, quality, players = players.len(), "match formed");
            self.events.publish(MatchmakingEvent::MatchFound {
                mode: mode.to_string(),
                teams,
                quality,
            });
        }
    }

    pub fn matches_formed(&self) -> u64 {
        self.matches_formed
    }

    pub fn is_queued(&self, player: PlayerId) -> bool {
        self.in_queue_or_match.contains(&player)
    }
}

impl Default for Matchmaker {
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

    #[test]
    fn forms_balanced_3v3_from_six_close_ratings() {
        let mut mm = Matchmaker::new();
        mm.register_mode("arena_3v3", ModeConfig::arena_3v3());
        let now = Instant::now();
        let ratings = [1500, 1520, 1480, 1510, 1495, 1505];
        for (i, &r) in ratings.iter().enumerate() {
            mm.enqueue(pid(i as u64), "arena_3v3", r, "us-east", 40, now).unwrap();
        }
        mm.tick(now);
        assert_eq!(mm.matches_formed(), 1);
        for i in 0..6u64 {
            assert!(!mm.is_queued(pid(i)));
        }
    }

    #[test]
    fn window_expansion_eventually_matches_wide_gap() {
        let mut mm = Matchmaker::new();
        let mut config = ModeConfig::arena_1v1();
        config.initial_rating_window = 100;
        config.max_rating_window = 500;
        config.window_growth_per_second = 50.0;
        config.quality_threshold = 0.0;
        mm.register_mode("arena_1v1", config);

        let now = Instant::now();
        mm.enqueue(pid(1), "arena_1v1", 1500, "us-east", 40, now).unwrap();
        mm.enqueue(pid(2), "arena_1v1", 2000, "us-east", 40, now).unwrap();

        mm.tick(now);
        assert_eq!(mm.matches_formed(), 0);

        let later = now + Duration::from_secs(9);
        mm.tick(later);
        assert_eq!(mm.matches_formed(), 1);
    }

    #[test]
    fn queue_timeout_evicts_and_emits_event() {
        let mut mm = Matchmaker::new();
        let mut config = ModeConfig::arena_1v1();
        config.max_queue_time = Duration::from_secs(10);
        mm.register_mode("arena_1v1", config);

        let now = Instant::now();
        mm.enqueue(pid(1), "arena_1v1", 1500, "us-east", 40, now).unwrap();
        let mut sub = mm.events().subscribe();

        let later = now + Duration::from_secs(20);
        mm.tick(later);
        assert!(!mm.is_queued(pid(1)));
        let event = sub.try_recv().expect("timeout event published");
        assert!(matches!(event, MatchmakingEvent::QueueTimeout { .. }));
    }

    #[test]
    fn double_enqueue_rejected() {
        let mut mm = Matchmaker::new();
        mm.register_mode("arena_1v1", ModeConfig::arena_1v1());
        let now = Instant::now();
        mm.enqueue(pid(1), "arena_1v1", 1500, "us-east", 40, now).unwrap();
        let err = mm
            .enqueue(pid(1), "arena_1v1", 1500, "us-east", 40, now)
            .unwrap_err();
        assert!(matches!(err, MatchmakingError::AlreadyQueued(_)));
    }
}
