use std::collections::{HashMap, VecDeque};

use common::collaborators::{Position, WorldInterface};
use common::ids::PlayerId;
use tracing::warn;

/// Shard coordinates instanced guild wars teleport participants into.
const INSTANCE_ENTRY: Position = Position { x: 0.0, y: 0.0, z: -1000.0 };

#[derive(Debug, Clone, Copy)]
enum TeleportTask {
    Enter { player: PlayerId },
    Exit { player: PlayerId },
}

/// Best-effort teleport queue for instanced guild wars. Entries are recorded
/// with the world's reported position just before teleporting in, so exits
/// can restore it; draining never affects core state.
#[derive(Default)]
pub struct TeleportQueue {
    pending: VecDeque<TeleportTask>,
    original_positions: HashMap<PlayerId, Position>,
}

impl TeleportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_enter(&mut self, player: PlayerId) {
        self.pending.push_back(TeleportTask::Enter { player });
    }

    pub fn queue_exit(&mut self, player: PlayerId) {
        self.pending.push_back(TeleportTask::Exit { player });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drains every queued teleport through `world`, logging and discarding
    /// failures. A world outage must not stall the tick loop.
    pub async fn flush(&mut self, world: &dyn WorldInterface) {
        while let Some(task) = self.pending.pop_front() {
            match task {
                TeleportTask::Enter { player } => {
                    match world.position(player).await {
                        Ok(pos) => {
                            self.original_positions.insert(player, pos);
                        }
                        Err(err) => warn!(%err, %player, "failed to read position before instanced war entry"),
                    }
                    if let Err(err) = world.teleport(player, INSTANCE_ENTRY).await {
                        warn!(%err, %player, "failed to teleport player into war instance");
                    }
                }
                TeleportTask::Exit { player } => {
                    let to = self.original_positions.remove(&player).unwrap_or(INSTANCE_ENTRY);
                    if let Err(err) = world.teleport(player, to).await {
                        warn!(%err, %player, "failed to teleport player back from war instance");
                    }
                }
            }
        }
    }
}
