/// K-factor schedule applied when a mode does not override it with a flat
/// value. Grounded in the reference matchmaking service's rating curve.
#[derive(Debug, Clone, Copy)]
pub enum KFactorSchedule {
    Tiered { provisional: i32, standard: i32, veteran: i32, veteran_rating: i32, provisional_games: u32 },
    Flat(i32),
}

impl Default for KFactorSchedule {
    fn default() -> Self {
        KFactorSchedule::Tiered {
            provisional: 40,
            standard: 32,
            veteran: 16,
            veteran_rating: 2400,
            provisional_games: 30,
        }
    }
}

impl KFactorSchedule {
    pub fn k_for(&self, rating: i32, games_played: u32) -> i32 {
        match *self {
            KFactorSchedule::Flat(k) => k,
            KFactorSchedule::Tiered {
                provisional,
                standard,
                veteran,
                veteran_rating,
                provisional_games,
            } => {
                if games_played < provisional_games {
                    provisional
                } else if rating > veteran_rating {
                    veteran
                } else {
                    standard
                }
            }
        }
    }
}

/// Standard 400-point-scale expected score.
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) as f64 / 400.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    fn actual_score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

/// Computes the signed rating delta for a player. A non-draw winner's
/// minimum gain is clamped to 1 point, matching the reference engine.
pub fn rating_delta(rating: i32, opponent_rating: i32, outcome: Outcome, k: i32) -> i32 {
    let expected = expected_score(rating, opponent_rating);
    let raw = k as f64 * (outcome.actual_score() - expected);
    let rounded = raw.round() as i32;
    match outcome {
        Outcome::Win if rounded < 1 => 1,
        Outcome::Loss if rounded > -1 => -1,
        _ => rounded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_score_symmetric() {
        let a = expected_score(1600, 1400);
        let b = expected_score(1400, 1600);
        assert!((a + b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn delta_matches_reference_scenario() {
        // 1600 vs 1400, K=32: expected winner ~0.7597, delta ~8
        let delta = rating_delta(1600, 1400, Outcome::Win, 32);
        assert_eq!(delta, 8);
        let delta_loser = rating_delta(1400, 1600, Outcome::Loss, 32);
        assert_eq!(delta_loser, -8);
    }

    #[test]
    fn winner_never_loses_points() {
        let delta = rating_delta(2600, 1000, Outcome::Win, 16);
        assert!(delta >= 1);
    }

    #[test]
    fn k_factor_schedule_tiers() {
        let schedule = KFactorSchedule::default();
        assert_eq!(schedule.k_for(1500, 5), 40);
        assert_eq!(schedule.k_for(1500, 50), 32);
        assert_eq!(schedule.k_for(2500, 50), 16);
    }
}
