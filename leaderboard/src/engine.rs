use std::collections::HashMap;
use std::time::Duration;

use common::ids::PlayerId;
use rating::Tier;
use tracing::debug;

use crate::cache::PageCache;
use crate::error::LeaderboardError;
use crate::page::{CategoryStats, LeaderboardPage, LeaderboardQuery, PlayerPosition, PAGE_SIZE};
use crate::store::{CategoryTable, RowUpdate};

pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(30);

pub struct LeaderboardConfig {
    pub page_ttl: Duration,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { page_ttl: DEFAULT_PAGE_TTL }
    }
}

pub struct LeaderboardStore {
    tables: HashMap<String, CategoryTable>,
    streaks: HashMap<(String, PlayerId), i32>,
    cache: PageCache,
}

impl LeaderboardStore {
    pub fn new(config: LeaderboardConfig) -> Self {
        Self {
            tables: HashMap::new(),
            streaks: HashMap::new(),
            cache: PageCache::new(config.page_ttl),
        }
    }

    /// Ingests the outcome of one finished match for one player. Called by
    /// the dispatcher after the rating engine has applied its delta.
    pub fn record_match_result(
        &mut self,
        category: &str,
        player: PlayerId,
        rating: i32,
        tier: Tier,
        wins: u32,
        losses: u32,
        matches: u32,
        won: Option<bool>,
    ) {
        let streak_key = (category.to_string(), player);
        let streak = self.streaks.entry(streak_key).or_insert(0);
        match won {
            Some(true) => *streak = (*streak).max(0) + 1,
            Some(false) => *streak = (*streak).min(0) - 1,
            None => {}
        }
        let streak_value = *streak;

        let table = self.tables.entry(category.to_string()).or_default();
        table.update(RowUpdate {
            player,
            rating,
            tier,
            wins,
            losses,
            matches,
            streak: streak_value,
        });
        self.cache.invalidate_category(category);
        debug!(category, %player, rating, "leaderboard row updated");
    }

    pub fn remove_player(&mut self, category: &str, player: PlayerId) {
        if let Some(table) = self.tables.get_mut(category) {
            table.remove(player);
            self.cache.invalidate_category(category);
        }
    }

    pub fn page(&mut self, query: LeaderboardQuery<'_>) -> Result<LeaderboardPage, LeaderboardError> {
        if let Some(cached) = self.cache.get(query.category, query.page) {
            return Ok(cached);
        }

        let table = self
            .tables
            .get(query.category)
            .ok_or_else(|| LeaderboardError::UnknownCategory(query.category.to_string()))?;

        let start = query.page as usize * PAGE_SIZE;
        let rows = table
            .rows()
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .cloned()
            .collect();

        let page = LeaderboardPage {
            category: query.category.to_string(),
            page: query.page,
            total_entries: table.len() as u32,
            rows,
        };
        self.cache.put(query.category, query.page, page.clone());
        Ok(page)
    }

    pub fn position(&self, category: &str, player: PlayerId) -> Option<PlayerPosition> {
        let table = self.tables.get(category)?;
        let rank = table.rank_of(player)?;
        let percentile = table.percentile(rank);

        let rows = table.rows();
        let idx = (rank - 1) as usize;
        let lo = idx.saturating_sub(2);
        let hi = (idx + 3).min(rows.len());
        let neighborhood = rows[lo..hi].to_vec();

        Some(PlayerPosition { rank, percentile, neighborhood })
    }

    pub fn stats(&self, category: &str) -> CategoryStats {
        let Some(table) = self.tables.get(category) else {
            return CategoryStats::default();
        };
        if table.is_empty() {
            return CategoryStats::default();
        }

        let total_players = table.len() as u32;
        let sum: i64 = table.rows().iter().map(|r| r.rating as i64).sum();
        let average_rating = sum as f64 / total_players as f64;

        let mut tier_counts: HashMap<&'static str, u32> = HashMap::new();
        for row in table.rows() {
            *tier_counts.entry(tier_label(row.tier)).or_insert(0) += 1;
        }
        let mut tier_distribution: Vec<(String, u32)> = tier_counts
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        tier_distribution.sort_by(|a, b| a.0.cmp(&b.0));

        CategoryStats {
            total_players,
            average_rating,
            tier_distribution,
        }
    }

    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.cache.hits + self.cache.misses;
        if total == 0 {
            return 0.0;
        }
        self.cache.hits as f64 / total as f64
    }
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Unranked => "unranked",
        Tier::Bronze => "bronze",
        Tier::Silver => "silver",
        Tier::Gold => "gold",
        Tier::Platinum => "platinum",
        Tier::Diamond => "diamond",
        Tier::Master => "master",
        Tier::Grandmaster => "grandmaster",
        Tier::Challenger => "challenger",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reflects_inserted_rows_and_caches() {
        let mut store = LeaderboardStore::new(LeaderboardConfig::default());
        for i in 0..5u64 {
            store.record_match_result(
                "arena_1v1",
                PlayerId(i),
                1500 + i as i32 * 10,
                Tier::Bronze,
                1,
                0,
                1,
                Some(true),
            );
        }
        let page = store
            .page(LeaderboardQuery { category: "arena_1v1", page: 0 })
            .unwrap();
        assert_eq!(page.total_entries, 5);
        assert_eq!(page.rows[0].player, PlayerId(4));

        // second read should hit cache
        let _ = store.page(LeaderboardQuery { category: "arena_1v1", page: 0 }).unwrap();
        assert!(store.cache_hit_ratio() > 0.0);
    }

    #[test]
    fn unknown_category_errors() {
        let mut store = LeaderboardStore::new(LeaderboardConfig::default());
        let err = store
            .page(LeaderboardQuery { category: "nope", page: 0 })
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::UnknownCategory(_)));
    }

    #[test]
    fn position_includes_neighborhood() {
        let mut store = LeaderboardStore::new(LeaderboardConfig::default());
        for i in 0..10u64 {
            store.record_match_result(
                "arena_1v1",
                PlayerId(i),
                1000 + i as i32 * 5,
                Tier::Bronze,
                1,
                0,
                1,
                Some(true),
            );
        }
        let pos = store.position("arena_1v1", PlayerId(5)).unwrap();
        assert!(pos.neighborhood.iter().any(|r| r.player == PlayerId(5)));
    }
}
