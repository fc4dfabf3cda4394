use std::cmp::Ordering;
use std::collections::HashMap;

use common::ids::PlayerId;
use rating::Tier;

use crate::row::{row_cmp, LeaderboardRow};

#[derive(Debug, Default)]
pub struct CategoryTable {
    rows: Vec<LeaderboardRow>,
    index: HashMap<PlayerId, usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct RowUpdate {
    pub player: PlayerId,
    pub rating: i32,
    pub tier: Tier,
    pub wins: u32,
    pub losses: u32,
    pub matches: u32,
    pub streak: i32,
}

impl CategoryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows
    }

    pub fn rank_of(&self, player: PlayerId) -> Option<u32> {
        self.index.get(&player).map(|&i| self.rows[i].rank)
    }

    pub fn row_of(&self, player: PlayerId) -> Option<&LeaderboardRow> {
        self.index.get(&player).map(|&i| &self.rows[i])
    }

    /// Applies a rating change, repositioning the player's row and
    /// renumbering exactly the contiguous range of ranks that shifted.
    pub fn update(&mut self, change: RowUpdate) {
        let previous_rank = self.index.get(&change.player).map(|&i| self.rows[i].rank);

        let removed_idx = self.index.remove(&change.player);
        if let Some(idx) = removed_idx {
            self.rows.remove(idx);
            self.reindex_from(idx);
        }

        let new_row = LeaderboardRow {
            rank: 0,
            previous_rank,
            player: change.player,
            rating: change.rating,
            tier: change.tier,
            wins: change.wins,
            losses: change.losses,
            matches: change.matches,
            streak: change.streak,
        };

        let insert_at = self
            .rows
            .binary_search_by(|existing| row_cmp(existing, &new_row))
            .unwrap_or_else(|pos| pos);
        self.rows.insert(insert_at, new_row);

        let old_idx = removed_idx.unwrap_or(self.rows.len() - 1);
        let (lo, hi) = if old_idx <= insert_at {
            (old_idx, insert_at)
        } else {
            (insert_at, old_idx)
        };
        self.renumber_range(lo, hi);
        self.reindex_from(lo);
    }

    pub fn remove(&mut self, player: PlayerId) -> bool {
        if let Some(idx) = self.index.remove(&player) {
            self.rows.remove(idx);
            self.renumber_range(idx, self.rows.len().saturating_sub(1));
            self.reindex_from(idx);
            true
        } else {
            false
        }
    }

    fn renumber_range(&mut self, lo: usize, hi: usize) {
        let hi = hi.min(self.rows.len().saturating_sub(1));
        for i in lo..=hi.max(lo) {
            if let Some(row) = self.rows.get_mut(i) {
                row.rank = (i + 1) as u32;
            }
        }
    }

    fn reindex_from(&mut self, from: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.rank = (i + 1) as u32;
            self.index.insert(row.player, i);
        }
        // entries before `from` are untouched and remain valid in `index`.
        if from == 0 {
            return;
        }
        for (i, row) in self.rows.iter().enumerate().take(from) {
            self.index.insert(row.player, i);
        }
    }

    pub fn percentile(&self, rank: u32) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        100.0 * (1.0 - (rank as f64 - 1.0) / self.rows.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upd(id: u64, rating: i32) -> RowUpdate {
        RowUpdate {
            player: PlayerId(id),
            rating,
            tier: rating::tier_of(rating),
            wins: 0,
            losses: 0,
            matches: 1,
            streak: 0,
        }
    }

    #[test]
    fn ranks_are_dense_permutation() {
        let mut table = CategoryTable::default();
        for (id, rating) in [(1, 1700), (2, 1500), (3, 1900), (4, 1600)] {
            table.update(upd(id, rating));
        }
        let mut ranks: Vec<u32> = table.rows().iter().map(|r| r.rank).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(table.rank_of(PlayerId(3)), Some(1));
        assert_eq!(table.rank_of(PlayerId(2)), Some(4));
    }

    #[test]
    fn update_reshuffles_and_keeps_others_consistent() {
        let mut table = CategoryTable::default();
        for (id, rating) in [(1, 1700), (2, 1720), (3, 1690), (4, 1680), (5, 1650)] {
            table.update(upd(id, rating));
        }
        assert_eq!(table.rank_of(PlayerId(5)), Some(5));
        // player 5 surges past everyone
        table.update(upd(5, 1800));
        assert_eq!(table.rank_of(PlayerId(5)), Some(1));
        let mut ranks: Vec<u32> = table.rows().iter().map(|r| r.rank).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }
}
