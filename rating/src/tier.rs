use serde::{Deserialize, Serialize};

/// Rating tier, a pure function of rating. Bands and decay policy are
/// grounded in the reference ranking system's tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

#[derive(Debug, Clone, Copy)]
pub struct TierBand {
    pub tier: Tier,
    pub min_rating: i32,
    /// `None` means unbounded above.
    pub max_rating: Option<i32>,
    pub decay: Option<DecayPolicy>,
}

#[derive(Debug, Clone, Copy)]
pub struct DecayPolicy {
    pub inactive_days: u32,
    pub daily_rating_loss: i32,
    pub floor: i32,
}

/// Tier bands in ascending order. `tier_of` relies on this being sorted.
pub const TIER_BANDS: &[TierBand] = &[
    TierBand { tier: Tier::Unranked, min_rating: i32::MIN, max_rating: Some(999), decay: None },
    TierBand { tier: Tier::Bronze, min_rating: 1000, max_rating: Some(1199), decay: None },
    TierBand { tier: Tier::Silver, min_rating: 1200, max_rating: Some(1399), decay: None },
    TierBand {
        tier: Tier::Gold,
        min_rating: 1400,
        max_rating: Some(1599),
        decay: Some(DecayPolicy { inactive_days: 14, daily_rating_loss: 5, floor: 1400 }),
    },
    TierBand {
        tier: Tier::Platinum,
        min_rating: 1600,
        max_rating: Some(1799),
        decay: Some(DecayPolicy { inactive_days: 7, daily_rating_loss: 10, floor: 1600 }),
    },
    TierBand {
        tier: Tier::Diamond,
        min_rating: 1800,
        max_rating: Some(1999),
        decay: Some(DecayPolicy { inactive_days: 7, daily_rating_loss: 15, floor: 1800 }),
    },
    TierBand {
        tier: Tier::Master,
        min_rating: 2000,
        max_rating: Some(2199),
        decay: Some(DecayPolicy { inactive_days: 3, daily_rating_loss: 20, floor: 2000 }),
    },
    TierBand {
        tier: Tier::Grandmaster,
        min_rating: 2200,
        max_rating: Some(2399),
        decay: Some(DecayPolicy { inactive_days: 2, daily_rating_loss: 25, floor: 2200 }),
    },
    TierBand {
        tier: Tier::Challenger,
        min_rating: 2400,
        max_rating: None,
        decay: Some(DecayPolicy { inactive_days: 1, daily_rating_loss: 30, floor: 2400 }),
    },
];

pub fn tier_of(rating: i32) -> Tier {
    for band in TIER_BANDS {
        let above_min = rating >= band.min_rating;
        let below_max = band.max_rating.map(|m| rating <= m).unwrap_or(true);
        if above_min && below_max {
            return band.tier;
        }
    }
    Tier::Unranked
}

pub fn decay_policy_for(tier: Tier) -> Option<DecayPolicy> {
    TIER_BANDS.iter().find(|b| b.tier == tier).and_then(|b| b.decay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_monotone_boundaries() {
        assert_eq!(tier_of(999), Tier::Unranked);
        assert_eq!(tier_of(1000), Tier::Bronze);
        assert_eq!(tier_of(1199), Tier::Bronze);
        assert_eq!(tier_of(1200), Tier::Silver);
        assert_eq!(tier_of(2400), Tier::Challenger);
        assert_eq!(tier_of(9999), Tier::Challenger);
    }

    #[test]
    fn tier_is_monotone_in_rating() {
        let samples = [-100, 500, 999, 1000, 1300, 1599, 1600, 2399, 2400, 5000];
        for w in samples.windows(2) {
            assert!(tier_of(w[0]) <= tier_of(w[1]));
        }
    }
}
