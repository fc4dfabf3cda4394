use std::time::Duration;

use common::ids::PlayerId;

use crate::config::ModeConfig;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub player: PlayerId,
    pub rating: i32,
    pub ping_ms: u32,
    pub waited: Duration,
}

/// Snake-draft seeding: sort by rating descending, then deal into
/// `team_count` teams alternating direction each pass (1-2-2-1 for two
/// teams), which minimizes inter-team average-rating gap.
pub fn snake_seed(mut candidates: Vec<Candidate>, team_count: u32) -> Vec<Vec<Candidate>> {
    candidates.sort_by(|a, b| b.rating.cmp(&a.rating));
    let team_count = team_count.max(1) as usize;
    let mut teams: Vec<Vec<Candidate>> = (0..team_count).map(|_| Vec::new()).collect();

    let mut forward = true;
    let mut idx = 0usize;
    for candidate in candidates {
        teams[idx].push(candidate);
        if forward {
            if idx + 1 == team_count {
                forward = false;
            } else {
                idx += 1;
            }
        } else if idx == 0 {
            forward = true;
        } else {
            idx -= 1;
        }
    }
    teams
}

pub fn team_average_rating(team: &[Candidate]) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    team.iter().map(|c| c.rating as f64).sum::<f64>() / team.len() as f64
}

/// Quality in `[0, 1]`: 0.5 rating balance + 0.3 wait time + 0.2 ping,
/// weights grounded in the reference matchmaking service.
pub fn match_quality(teams: &[Vec<Candidate>], config: &ModeConfig) -> f64 {
    let averages: Vec<f64> = teams.iter().map(|t| team_average_rating(t)).collect();
    let max_avg = averages.iter().cloned().fold(f64::MIN, f64::max);
    let min_avg = averages.iter().cloned().fold(f64::MAX, f64::min);
    let gap = (max_avg - min_avg).max(0.0);
    let balance_score = (1.0 - gap / config.max_rating_window as f64).clamp(0.0, 1.0);

    let all: Vec<&Candidate> = teams.iter().flatten().collect();
    let avg_wait = all.iter().map(|c| c.waited.as_secs_f64()).sum::<f64>() / all.len() as f64;
    let wait_cap = config.max_queue_time.as_secs_f64().max(1.0);
    let wait_score = (avg_wait / wait_cap).clamp(0.0, 1.0);

    let avg_ping = all.iter().map(|c| c.ping_ms as f64).sum::<f64>() / all.len() as f64;
    let ping_score = (1.0 - avg_ping / config.max_latency_ms as f64).clamp(0.0, 1.0);

    0.5 * balance_score + 0.3 * wait_score + 0.2 * ping_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ids::PlayerId;

    fn candidate(id: u64, rating: i32) -> Candidate {
        Candidate { player: PlayerId(id), rating, ping_ms: 50, waited: Duration::from_secs(5) }
    }

    #[test]
    fn snake_seed_balances_two_teams() {
        let candidates = vec![
            candidate(1, 2000),
            candidate(2, 1900),
            candidate(3, 1800),
            candidate(4, 1700),
        ];
        let teams = snake_seed(candidates, 2);
        assert_eq!(teams.len(), 2);
        // 1-2-2-1 pattern: team0 gets rank1 & rank4, team1 gets rank2 & rank3
        let avg0 = team_average_rating(&teams[0]);
        let avg1 = team_average_rating(&teams[1]);
        assert!((avg0 - avg1).abs() <= 50.0);
    }

    #[test]
    fn quality_drops_with_large_rating_gap() {
        let config = ModeConfig::arena_1v1();
        let balanced = vec![vec![candidate(1, 1500)], vec![candidate(2, 1510)]];
        let lopsided = vec![vec![candidate(1, 1000)], vec![candidate(2, 2000)]];
        assert!(match_quality(&balanced, &config) > match_quality(&lopsided, &config));
    }
}
