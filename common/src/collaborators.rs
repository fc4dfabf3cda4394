//! Trait boundaries for systems the coordination core consumes but does not
//! own: the player directory, world/movement interface, reward grants,
//! player-facing broadcast, and persistence. Production implementations live
//! outside this workspace; only in-memory fakes ship here, for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::BoxError;
use crate::ids::{Faction, GuildId, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    async fn name(&self, player: PlayerId) -> Result<String, BoxError>;
    async fn class(&self, player: PlayerId) -> Result<String, BoxError>;
    async fn level(&self, player: PlayerId) -> Result<u32, BoxError>;
    async fn region(&self, player: PlayerId) -> Result<String, BoxError>;
    async fn ping_ms(&self, player: PlayerId) -> Result<u32, BoxError>;
    async fn guild(&self, player: PlayerId) -> Result<Option<GuildId>, BoxError>;
}

#[async_trait]
pub trait WorldInterface: Send + Sync {
    async fn teleport(&self, player: PlayerId, to: Position) -> Result<(), BoxError>;
    async fn position(&self, player: PlayerId) -> Result<Position, BoxError>;
    async fn is_dead(&self, player: PlayerId) -> Result<bool, BoxError>;
    async fn is_connected(&self, player: PlayerId) -> Result<bool, BoxError>;
}

#[async_trait]
pub trait RewardGrants: Send + Sync {
    async fn grant_currency(&self, player: PlayerId, currency: &str, amount: i64) -> Result<(), BoxError>;
    async fn grant_item(&self, player: PlayerId, item_id: &str, quantity: u32) -> Result<(), BoxError>;
    async fn grant_title(&self, player: PlayerId, title: &str) -> Result<(), BoxError>;
}

#[async_trait]
pub trait Broadcast: Send + Sync {
    async fn send(&self, player: PlayerId, message: &str) -> Result<(), BoxError>;
    async fn announce(&self, message: &str) -> Result<(), BoxError>;
}

#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn save_rankings(&self, category: &str, blob: &[u8]) -> Result<(), BoxError>;
    async fn load_rankings(&self, category: &str) -> Result<Option<Vec<u8>>, BoxError>;
    async fn save_match_log(&self, match_id: &str, blob: &[u8]) -> Result<(), BoxError>;
}

/// In-memory fake used by the core's own test suite. Never wired into a
/// production binary.
#[derive(Default)]
pub struct InMemoryWorld {
    names: RwLock<HashMap<PlayerId, String>>,
    classes: RwLock<HashMap<PlayerId, String>>,
    levels: RwLock<HashMap<PlayerId, u32>>,
    regions: RwLock<HashMap<PlayerId, String>>,
    pings: RwLock<HashMap<PlayerId, u32>>,
    guilds: RwLock<HashMap<PlayerId, GuildId>>,
    positions: RwLock<HashMap<PlayerId, Position>>,
    dead: RwLock<HashMap<PlayerId, bool>>,
    connected: RwLock<HashMap<PlayerId, bool>>,
    rankings: RwLock<HashMap<String, Vec<u8>>>,
    match_log: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_player(&self, player: PlayerId, name: &str, class: &str, level: u32, region: &str, ping_ms: u32) {
        self.names.write().unwrap().insert(player, name.to_string());
        self.classes.write().unwrap().insert(player, class.to_string());
        self.levels.write().unwrap().insert(player, level);
        self.regions.write().unwrap().insert(player, region.to_string());
        self.pings.write().unwrap().insert(player, ping_ms);
        self.connected.write().unwrap().insert(player, true);
        self.dead.write().unwrap().insert(player, false);
    }

    pub fn set_guild(&self, player: PlayerId, guild: GuildId) {
        self.guilds.write().unwrap().insert(player, guild);
    }

    pub fn set_connected(&self, player: PlayerId, connected: bool) {
        self.connected.write().unwrap().insert(player, connected);
    }

    pub fn set_dead(&self, player: PlayerId, dead: bool) {
        self.dead.write().unwrap().insert(player, dead);
    }

    pub fn set_faction(&self, _player: PlayerId, _faction: Faction) {
        // faction membership is tracked by the worldpvp component itself;
        // this fake only models the collaborator surface it reads from.
    }
}

#[async_trait]
impl PlayerDirectory for InMemoryWorld {
    async fn name(&self, player: PlayerId) -> Result<String, BoxError> {
        Ok(self
            .names
            .read()
            .unwrap()
            .get(&player)
            .cloned()
            .unwrap_or_else(|| format!("player-{}", player.0)))
    }

    async fn class(&self, player: PlayerId) -> Result<String, BoxError> {
        Ok(self
            .classes
            .read()
            .unwrap()
            .get(&player)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string()))
    }

    async fn level(&self, player: PlayerId) -> Result<u32, BoxError> {
        Ok(*self.levels.read().unwrap().get(&player).unwrap_or(&1))
    }

    async fn region(&self, player: PlayerId) -> Result<String, BoxError> {
        Ok(self
            .regions
            .read()
            .unwrap()
            .get(&player)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string()))
    }

    async fn ping_ms(&self, player: PlayerId) -> Result<u32, BoxError> {
        Ok(*self.pings.read().unwrap().get(&player).unwrap_or(&50))
    }

    async fn guild(&self, player: PlayerId) -> Result<Option<GuildId>, BoxError> {
        Ok(self.guilds.read().unwrap().get(&player).copied())
    }
}

#[async_trait]
impl WorldInterface for InMemoryWorld {
    async fn teleport(&self, player: PlayerId, to: Position) -> Result<(), BoxError> {
        self.positions.write().unwrap().insert(player, to);
        Ok(())
    }

    async fn position(&self, player: PlayerId) -> Result<Position, BoxError> {
        Ok(self
            .positions
            .read()
            .unwrap()
            .get(&player)
            .copied()
            .unwrap_or(Position { x: 0.0, y: 0.0, z: 0.0 }))
    }

    async fn is_dead(&self, player: PlayerId) -> Result<bool, BoxError> {
        Ok(*self.dead.read().unwrap().get(&player).unwrap_or(&false))
    }

    async fn is_connected(&self, player: PlayerId) -> Result<bool, BoxError> {
        Ok(*self.connected.read().unwrap().get(&player).unwrap_or(&true))
    }
}

#[async_trait]
impl RewardGrants for InMemoryWorld {
    async fn grant_currency(&self, _player: PlayerId, _currency: &str, _amount: i64) -> Result<(), BoxError> {
        Ok(())
    }

    async fn grant_item(&self, _player: PlayerId, _item_id: &str, _quantity: u32) -> Result<(), BoxError> {
        Ok(())
    }

    async fn grant_title(&self, _player: PlayerId, _title: &str) -> Result<(), BoxError> {
        Ok(())
    }
}

#[async_trait]
impl Broadcast for InMemoryWorld {
    async fn send(&self, _player: PlayerId, _message: &str) -> Result<(), BoxError> {
        Ok(())
    }

    async fn announce(&self, _message: &str) -> Result<(), BoxError> {
        Ok(())
    }
}

#[async_trait]
impl PersistenceSink for InMemoryWorld {
    async fn save_rankings(&self, category: &str, blob: &[u8]) -> Result<(), BoxError> {
        self.rankings
            .write()
            .unwrap()
            .insert(category.to_string(), blob.to_vec());
        Ok(())
    }

    async fn load_rankings(&self, category: &str) -> Result<Option<Vec<u8>>, BoxError> {
        Ok(self.rankings.read().unwrap().get(category).cloned())
    }

    async fn save_match_log(&self, match_id: &str, blob: &[u8]) -> Result<(), BoxError> {
        self.match_log
            .write()
            .unwrap()
            .insert(match_id.to_string(), blob.to_vec());
        Ok(())
    }
}
