use std::time::Instant;

use common::ids::PlayerId;

#[derive(Debug, Clone)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub team: u8,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub healing: u64,
    pub cc_score: u32,
    pub connected: bool,
    pub respawn_at: Option<Instant>,
}

impl PlayerStats {
    pub fn new(player: PlayerId, team: u8) -> Self {
        Self {
            player,
            team,
            kills: 0,
            deaths: 0,
            assists: 0,
            damage_dealt: 0,
            damage_taken: 0,
            healing: 0,
            cc_score: 0,
            connected: true,
            respawn_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.respawn_at.is_none()
    }

    /// MVP score: kills + 0.5*assists - deaths + damage/1000 + healing/2000
    /// + cc_score/100.
    pub fn mvp_score(&self) -> f64 {
        self.kills as f64 + 0.5 * self.assists as f64 - self.deaths as f64
            + self.damage_dealt as f64 / 1000.0
            + self.healing as f64 / 2000.0
            + self.cc_score as f64 / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MvpReason {
    TopFragger,
    TopHealer,
    BestOverall,
}

/// Deterministic MVP selection: highest `mvp_score`, ties broken by more
/// kills, then fewer deaths, then lower player id.
pub fn select_mvp(stats: &[PlayerStats]) -> Option<(PlayerId, MvpReason)> {
    let best = stats.iter().max_by(|a, b| {
        a.mvp_score()
            .partial_cmp(&b.mvp_score())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.kills.cmp(&b.kills))
            .then(b.deaths.cmp(&a.deaths))
            .then(b.player.cmp(&a.player))
    })?;

    let top_fragger = stats.iter().max_by_key(|s| s.kills).map(|s| s.player) == Some(best.player);
    let top_healer = stats.iter().max_by_key(|s| s.healing).map(|s| s.player) == Some(best.player);

    let reason = if top_fragger {
        MvpReason::TopFragger
    } else if top_healer {
        MvpReason::TopHealer
    } else {
        MvpReason::BestOverall
    };

    Some((best.player, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mvp_prefers_higher_score() {
        let mut a = PlayerStats::new(PlayerId(1), 0);
        a.kills = 10;
        let mut b = PlayerStats::new(PlayerId(2), 1);
        b.kills = 2;
        b.healing = 10000;
        let (mvp, _) = select_mvp(&[a, b]).unwrap();
        assert_eq!(mvp, PlayerId(1));
    }

    #[test]
    fn mvp_tie_break_by_kills_then_id() {
        let mut a = PlayerStats::new(PlayerId(5), 0);
        a.kills = 5;
        a.deaths = 2;
        let mut b = PlayerStats::new(PlayerId(2), 1);
        b.kills = 6;
        b.deaths = 2;
        let (mvp, _) = select_mvp(&[a, b]).unwrap();
        assert_eq!(mvp, PlayerId(2));
    }
}
