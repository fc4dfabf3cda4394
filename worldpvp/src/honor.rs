use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use common::ids::PlayerId;

/// Tracks recent sanctioned kills per (killer, victim) pair to apply
/// diminishing returns on repeat kills inside a sliding window.
#[derive(Default)]
pub struct HonorLedger {
    recent_kills: HashMap<(PlayerId, PlayerId), VecDeque<Instant>>,
}

fn prune_window(entries: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = entries.front() {
        if now.duration_since(front) > window {
            entries.pop_front();
        } else {
            break;
        }
    }
}

impl HonorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sanctioned kill and returns the awarded honor.
    pub fn record_kill(
        &mut self,
        killer: PlayerId,
        victim: PlayerId,
        now: Instant,
        window: Duration,
        base: u32,
        in_enemy_territory: bool,
    ) -> u32 {
        let entries = self.recent_kills.entry((killer, victim)).or_default();
        prune_window(entries, now, window);
        let recent_count = entries.len() as u32;
        entries.push_back(now);

        let multiplier = if in_enemy_territory { 1.5 } else { 1.0 };
        ((base as f32 / (recent_count + 1).max(1) as f32) * multiplier).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_kills_diminish_within_window() {
        let mut ledger = HonorLedger::new();
        let now = Instant::now();
        let window = Duration::from_secs(3600);
        let first = ledger.record_kill(PlayerId(1), PlayerId(2), now, window, 10, false);
        let second = ledger.record_kill(PlayerId(1), PlayerId(2), now, window, 10, false);
        assert_eq!(first, 10);
        assert!(second < first);
    }

    #[test]
    fn kills_outside_window_do_not_diminish() {
        let mut ledger = HonorLedger::new();
        let now = Instant::now();
        let window = Duration::from_secs(1);
        let _ = ledger.record_kill(PlayerId(1), PlayerId(2), now, window, 10, false);
        let later = now + Duration::from_secs(5);
        let second = ledger.record_kill(PlayerId(1), PlayerId(2), later, window, 10, false);
        assert_eq!(second, 10);
    }

    #[test]
    fn enemy_territory_applies_multiplier() {
        let mut ledger = HonorLedger::new();
        let now = Instant::now();
        let window = Duration::from_secs(3600);
        let honor = ledger.record_kill(PlayerId(1), PlayerId(2), now, window, 10, true);
        assert_eq!(honor, 15);
    }
}
