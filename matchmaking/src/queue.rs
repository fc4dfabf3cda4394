use std::collections::VecDeque;
use std::time::Instant;

use common::ids::PlayerId;

use crate::config::ModeConfig;

pub const RECENT_OPPONENT_HORIZON: usize = 5;

#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub player: PlayerId,
    pub rating: i32,
    pub region: String,
    pub ping_ms: u32,
    pub enqueued_at: Instant,
    pub premade_group: Option<Vec<PlayerId>>,
    pub blocked: Vec<PlayerId>,
    pub recent_opponents: VecDeque<PlayerId>,
}

impl QueueEntry {
    pub fn new(player: PlayerId, rating: i32, region: &str, ping_ms: u32, now: Instant) -> Self {
        Self {
            player,
            rating,
            region: region.to_string(),
            ping_ms,
            enqueued_at: now,
            premade_group: None,
            blocked: Vec::new(),
            recent_opponents: VecDeque::new(),
        }
    }

    pub fn window_at(&self, config: &ModeConfig, now: Instant) -> i32 {
        config.window_at(now.saturating_duration_since(self.enqueued_at))
    }

    pub fn waited(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.enqueued_at)
    }

    pub fn note_recent_opponent(&mut self, opponent: PlayerId) {
        self.recent_opponents.push_back(opponent);
        while self.recent_opponents.len() > RECENT_OPPONENT_HORIZON {
            self.recent_opponents.pop_front();
        }
    }
}

/// Two entries are compatible iff their rating windows overlap, ping/region
/// constraints hold pairwise, and neither has recently faced the other.
pub fn compatible(a: &QueueEntry, b: &QueueEntry, config: &ModeConfig, now: Instant) -> bool {
    if a.player == b.player {
        return false;
    }
    if a.blocked.contains(&b.player) || b.blocked.contains(&a.player) {
        return false;
    }
    if a.recent_opponents.contains(&b.player) || b.recent_opponents.contains(&a.player) {
        return false;
    }

    let window = a.window_at(config, now).min(b.window_at(config, now));
    if (a.rating - b.rating).abs() > window {
        return false;
    }

    if !config.cross_region && a.region != b.region {
        return false;
    }

    let combined_ping = a.ping_ms.max(b.ping_ms);
    if combined_ping > config.max_latency_ms {
        return false;
    }

    true
}

#[derive(Debug, Default)]
pub struct ModeQueue {
    pub entries: VecDeque<QueueEntry>,
}

impl ModeQueue {
    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push_back(entry);
    }

    pub fn remove(&mut self, player: PlayerId) -> Option<QueueEntry> {
        let pos = self.entries.iter().position(|e| e.player == player)?;
        self.entries.remove(pos)
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.entries.iter().any(|e| e.player == player)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
