pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod honor;
pub mod zone;

pub use config::{Aabb, WorldPvpConfig, ZoneConfig, ZoneKind};
pub use engine::{PlayerPvpStats, WorldPvpRuntime};
pub use error::WorldPvpError;
pub use events::WorldPvpEvent;
pub use honor::HonorLedger;
pub use zone::{is_hostile, ZoneState};
