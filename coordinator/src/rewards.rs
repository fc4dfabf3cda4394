use std::collections::VecDeque;

use common::collaborators::RewardGrants;
use common::ids::PlayerId;
use rating::Tier;
use tracing::warn;

/// Best-effort grant queued while ticking. Draining never affects core
/// state; a failed grant is logged and dropped.
#[derive(Debug, Clone)]
pub enum RewardTask {
    Currency { player: PlayerId, currency: String, amount: i64 },
    Title { player: PlayerId, title: String },
}

#[derive(Default)]
pub struct RewardQueue {
    pending: VecDeque<RewardTask>,
}

impl RewardQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: RewardTask) {
        self.pending.push_back(task);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drains every queued task through `grants`, logging and discarding
    /// failures. Never returns an error: a reward collaborator outage must
    /// not stall the tick loop.
    pub async fn flush(&mut self, grants: &dyn RewardGrants) {
        while let Some(task) = self.pending.pop_front() {
            let result = match &task {
                RewardTask::Currency { player, currency, amount } => {
                    grants.grant_currency(*player, currency, *amount).await
                }
                RewardTask::Title { player, title } => grants.grant_title(*player, title).await,
            };
            if let Err(err) = result {
                warn!(%err, "reward grant failed, dropping");
            }
        }
    }
}

/// Currency bonus awarded on promotion into `tier`, grounded in the
/// reference tier table's reward metadata.
pub fn tier_up_bonus(tier: Tier) -> i64 {
    match tier {
        Tier::Unranked | Tier::Bronze => 0,
        Tier::Silver => 100,
        Tier::Gold => 250,
        Tier::Platinum => 500,
        Tier::Diamond => 1000,
        Tier::Master => 2000,
        Tier::Grandmaster => 4000,
        Tier::Challenger => 8000,
    }
}
